#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Employee,
    Customer,
}

impl Role {
    pub fn noun(self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Customer => "customer",
        }
    }
}

/// Identity of the logged-in user, passed explicitly to every handler that
/// attributes purchases, requests, or reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    role: Role,
    username: String,
}

impl Session {
    pub fn new(role: Role, username: impl Into<String>) -> Self {
        Self {
            role,
            username: username.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
