use assert_cmd::cargo_bin;
use predicates::prelude::*;
use assert_cmd::Command;

#[test]
fn test_admin_login_and_revenue() {
    let mut cmd = Command::new(cargo_bin!("brickshop-admin"));
    cmd.arg("--demo");
    cmd.write_stdin("bob\nbobpw\nc\nq\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("BRICKSHOP ADMIN LOGIN"))
        .stdout(predicate::str::contains(
            "The total revenue from this store is: $0.",
        ))
        .stdout(predicate::str::contains("Thanks for managing the Brickshop!"));
}

#[test]
fn test_admin_wrong_password_reprompts() {
    let mut cmd = Command::new(cargo_bin!("brickshop-admin"));
    cmd.arg("--demo");
    cmd.write_stdin("bob\nwrongpw\nbob\nbobpw\nq\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("WRONG USERNAME OR PASSWORD"))
        .stdout(predicate::str::contains("WELCOME TO BRICKSHOP ADMINISTRATION"));
}

#[test]
fn test_admin_non_employee_cannot_log_in() {
    let mut cmd = Command::new(cargo_bin!("brickshop-admin"));
    cmd.arg("--demo");
    // alice is a customer; input then runs out.
    cmd.write_stdin("alice\nalicepw\n");

    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("it doesn't look like you are a registered employee"))
        .stderr(predicate::str::contains("Login aborted."));
}

#[test]
fn test_admin_list_requests_starts_empty() {
    let mut cmd = Command::new(cargo_bin!("brickshop-admin"));
    cmd.arg("--demo");
    cmd.write_stdin("bob\nbobpw\na\nq\n");

    cmd.assert().success().stdout(predicate::str::contains(
        "Here is a list of unfulfilled request IDs",
    ));
}
