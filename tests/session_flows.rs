//! Full session flows through the library API: login composed with the menu
//! loops against the seeded demo backend.

use brickshop::application::Diagnostics;
use brickshop::application::admin::AdminApp;
use brickshop::application::customer::CustomerApp;
use brickshop::application::login::login;
use brickshop::domain::ports::StoreBackend;
use brickshop::domain::product::ProductId;
use brickshop::domain::session::{Role, Session};
use brickshop::infrastructure::demo::demo_store;
use brickshop::interfaces::console::Console;

#[tokio::test]
async fn test_customer_requests_then_admin_fulfills() {
    let store = demo_store().await.unwrap();
    let product = ProductId::new(7).unwrap();

    // Customer logs in and requests the out-of-stock castle.
    let mut out = Vec::new();
    {
        let script = b"alice\nalicepw\n";
        let mut console = Console::new(&script[..], &mut out);
        let session = login(&mut console, &store, Role::Customer)
            .await
            .unwrap()
            .expect("customer login");
        assert_eq!(session.username(), "alice");
    }
    let mut out = Vec::new();
    let app = CustomerApp::new(
        Console::new(&b"c\n7\nq\n"[..], &mut out),
        Box::new(store.clone()),
        Session::new(Role::Customer, "alice"),
        Diagnostics::Operator,
    );
    app.run().await.unwrap();

    let pending = store.pending_requests().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].product, product);
    let request = pending[0].request;

    // Admin lists and fulfills it; inventory goes from 0 to 1.
    let mut out = Vec::new();
    let script = format!("a\nb\n{request}\nq\n");
    let app = AdminApp::new(
        Console::new(script.as_bytes(), &mut out),
        Box::new(store.clone()),
        Session::new(Role::Employee, "bob"),
        Diagnostics::Operator,
    );
    app.run().await.unwrap();

    let rendered = String::from_utf8(out).unwrap();
    assert!(rendered.contains(&format!("Request #{request} requesting product #7.")));
    assert!(rendered.contains("Request successfully fulfilled."));
    assert_eq!(store.inventory(product).await.unwrap(), 1);
    assert!(store.pending_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_purchase_review_and_revenue_roundtrip() {
    let store = demo_store().await.unwrap();

    // Purchase, then review the purchase the handler reported.
    let mut out = Vec::new();
    let app = CustomerApp::new(
        Console::new(&b"b\n901\nd\n1\n5\nBest rover ever.\nq\n"[..], &mut out),
        Box::new(store.clone()),
        Session::new(Role::Customer, "alice"),
        Diagnostics::Operator,
    );
    app.run().await.unwrap();

    let rendered = String::from_utf8(out).unwrap();
    assert!(rendered.contains("Remember your purchase ID to write a review: 1."));
    assert!(rendered.contains("Thanks for your review!"));

    // The admin's revenue report reflects the sale.
    let mut out = Vec::new();
    let app = AdminApp::new(
        Console::new(&b"c\nq\n"[..], &mut out),
        Box::new(store.clone()),
        Session::new(Role::Employee, "bob"),
        Diagnostics::Operator,
    );
    app.run().await.unwrap();

    let rendered = String::from_utf8(out).unwrap();
    assert!(rendered.contains("The total revenue from this store is: $19.99."));
}
