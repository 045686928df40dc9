//! # Permission Policy
//!
//! Every access decision in the service goes through [`evaluate`], which reads
//! the declarative [`PERMISSIONS`] table. Administrators are granted access by
//! a table row like any other role.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    Customer,
    Staff,
    Manager,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Availability,
    Booking,
    Customer,
    Staff,
    Shift,
    Service,
    Inventory,
    PurchaseOrder,
    Payroll,
    LoyaltyProgram,
    LoyaltyWallet,
    Membership,
    Messaging,
    LocationSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

/// Whether a rule applies to every record or only to the subject's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Any,
    Own,
}

#[derive(Debug, Clone, Copy)]
pub enum Resources {
    All,
    Only(&'static [Resource]),
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub role: Role,
    pub resources: Resources,
    pub actions: &'static [Action],
    pub scope: Scope,
}

const READ: &[Action] = &[Action::Read];
const READ_WRITE: &[Action] = &[Action::Read, Action::Create, Action::Update];
const ALL_ACTIONS: &[Action] = &[Action::Read, Action::Create, Action::Update, Action::Delete];

pub const PERMISSIONS: &[Rule] = &[
    Rule {
        role: Role::Guest,
        resources: Resources::Only(&[Resource::Availability, Resource::Service]),
        actions: READ,
        scope: Scope::Any,
    },
    Rule {
        role: Role::Customer,
        resources: Resources::Only(&[
            Resource::Availability,
            Resource::Service,
            Resource::LoyaltyProgram,
        ]),
        actions: READ,
        scope: Scope::Any,
    },
    Rule {
        role: Role::Customer,
        resources: Resources::Only(&[Resource::Booking, Resource::Customer]),
        actions: READ_WRITE,
        scope: Scope::Own,
    },
    Rule {
        role: Role::Customer,
        resources: Resources::Only(&[Resource::LoyaltyWallet, Resource::Membership]),
        actions: READ,
        scope: Scope::Own,
    },
    Rule {
        role: Role::Staff,
        resources: Resources::Only(&[
            Resource::Availability,
            Resource::Service,
            Resource::Staff,
            Resource::Shift,
            Resource::Inventory,
            Resource::LoyaltyProgram,
            Resource::LoyaltyWallet,
            Resource::Membership,
        ]),
        actions: READ,
        scope: Scope::Any,
    },
    Rule {
        role: Role::Staff,
        resources: Resources::Only(&[Resource::Booking, Resource::Customer]),
        actions: READ_WRITE,
        scope: Scope::Any,
    },
    Rule {
        role: Role::Manager,
        resources: Resources::Only(&[
            Resource::Availability,
            Resource::Booking,
            Resource::Customer,
            Resource::Staff,
            Resource::Shift,
            Resource::Service,
            Resource::Inventory,
            Resource::PurchaseOrder,
            Resource::LoyaltyWallet,
            Resource::Membership,
            Resource::Messaging,
        ]),
        actions: ALL_ACTIONS,
        scope: Scope::Any,
    },
    Rule {
        role: Role::Manager,
        resources: Resources::Only(&[
            Resource::Payroll,
            Resource::LoyaltyProgram,
            Resource::LocationSettings,
        ]),
        actions: READ,
        scope: Scope::Any,
    },
    Rule {
        role: Role::Admin,
        resources: Resources::All,
        actions: ALL_ACTIONS,
        scope: Scope::Any,
    },
];

/// The caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub user_id: Option<Uuid>,
    pub role: Role,
}

impl Subject {
    pub fn guest() -> Self {
        Self {
            user_id: None,
            role: Role::Guest,
        }
    }
}

/// The target of an operation. `owner_id` is the customer or staff member the
/// record belongs to, when it belongs to anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: Resource,
    pub owner_id: Option<Uuid>,
}

impl ResourceRef {
    pub fn new(kind: Resource) -> Self {
        Self {
            kind,
            owner_id: None,
        }
    }

    pub fn owned_by(kind: Resource, owner_id: Uuid) -> Self {
        Self {
            kind,
            owner_id: Some(owner_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

impl Rule {
    fn matches(&self, subject: &Subject, resource: &ResourceRef, action: Action) -> bool {
        let covers_resource = match self.resources {
            Resources::All => true,
            Resources::Only(kinds) => kinds.contains(&resource.kind),
        };
        let in_scope = match self.scope {
            Scope::Any => true,
            Scope::Own => subject.user_id.is_some() && subject.user_id == resource.owner_id,
        };

        self.role == subject.role && covers_resource && self.actions.contains(&action) && in_scope
    }
}

/// Decides whether `subject` may perform `action` on `resource`.
pub fn evaluate(subject: &Subject, resource: &ResourceRef, action: Action) -> Decision {
    evaluate_with(PERMISSIONS, subject, resource, action)
}

/// Same as [`evaluate`] against a caller supplied table.
pub fn evaluate_with(
    table: &[Rule],
    subject: &Subject,
    resource: &ResourceRef,
    action: Action,
) -> Decision {
    if table.iter().any(|rule| rule.matches(subject, resource, action)) {
        Decision::Allow
    } else {
        Decision::Deny(format!(
            "{} may not {} {}",
            subject.role, action, resource.kind
        ))
    }
}

macro_rules! snake_case_names {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(format!("unknown {}: {}", stringify!($ty).to_lowercase(), other)),
                }
            }
        }
    };
}

snake_case_names!(Role {
    Guest => "guest",
    Customer => "customer",
    Staff => "staff",
    Manager => "manager",
    Admin => "admin",
});

snake_case_names!(Resource {
    Availability => "availability",
    Booking => "booking",
    Customer => "customer",
    Staff => "staff",
    Shift => "shift",
    Service => "service",
    Inventory => "inventory",
    PurchaseOrder => "purchase_order",
    Payroll => "payroll",
    LoyaltyProgram => "loyalty_program",
    LoyaltyWallet => "loyalty_wallet",
    Membership => "membership",
    Messaging => "messaging",
    LocationSettings => "location_settings",
});

snake_case_names!(Action {
    Read => "read",
    Create => "create",
    Update => "update",
    Delete => "delete",
});
