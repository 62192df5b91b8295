//! User record model.

use crate::UserId;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// One of the four independently unique fields of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    UserName,
    AccountNumber,
    EmailAddress,
    IdentityNumber,
}

impl UserField {
    /// All unique fields, in the order uniqueness is checked on create.
    pub const ALL: [Self; 4] = [
        Self::UserName,
        Self::AccountNumber,
        Self::EmailAddress,
        Self::IdentityNumber,
    ];

    /// Storage column name.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::UserName => "user_name",
            Self::AccountNumber => "account_number",
            Self::EmailAddress => "email_address",
            Self::IdentityNumber => "identity_number",
        }
    }

    /// Wire (JSON) name.
    #[must_use]
    pub const fn json_name(self) -> &'static str {
        match self {
            Self::UserName => "userName",
            Self::AccountNumber => "accountNumber",
            Self::EmailAddress => "emailAddress",
            Self::IdentityNumber => "identityNumber",
        }
    }

    /// Lower-case label used inside sentences.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UserName => "username",
            Self::AccountNumber => "account number",
            Self::EmailAddress => "email address",
            Self::IdentityNumber => "identity number",
        }
    }

    /// Capitalized label used at the start of a sentence.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::UserName => "Username",
            Self::AccountNumber => "Account number",
            Self::EmailAddress => "Email address",
            Self::IdentityNumber => "Identity number",
        }
    }

    /// Returns this field's value on a record.
    #[must_use]
    pub fn value_of(self, user: &User) -> &str {
        match self {
            Self::UserName => &user.user_name,
            Self::AccountNumber => &user.account_number,
            Self::EmailAddress => &user.email_address,
            Self::IdentityNumber => &user.identity_number,
        }
    }

    /// Attributes a store-level unique-index violation to a field.
    ///
    /// Index names embed the column name (`uq_users_email_address`), so the
    /// driver message is enough to find it. Only the text after `for key` is
    /// inspected so the duplicated value itself cannot mislead the match.
    #[must_use]
    pub fn from_constraint(message: &str) -> Option<Self> {
        let key = message.rsplit("for key").next().unwrap_or(message);
        Self::ALL
            .into_iter()
            .find(|field| key.contains(field.column()))
    }
}

impl Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_name())
    }
}

/// A persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    pub user_name: String,
    pub account_number: String,
    pub email_address: String,
    pub identity_number: String,
}

/// A user record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub user_name: String,
    pub account_number: String,
    pub email_address: String,
    pub identity_number: String,
}

impl NewUser {
    /// Creates a candidate record.
    #[must_use]
    pub fn new(
        user_name: impl Into<String>,
        account_number: impl Into<String>,
        email_address: impl Into<String>,
        identity_number: impl Into<String>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            account_number: account_number.into(),
            email_address: email_address.into(),
            identity_number: identity_number.into(),
        }
    }

    /// Returns the candidate's value for a unique field.
    #[must_use]
    pub fn value(&self, field: UserField) -> &str {
        match field {
            UserField::UserName => &self.user_name,
            UserField::AccountNumber => &self.account_number,
            UserField::EmailAddress => &self.email_address,
            UserField::IdentityNumber => &self.identity_number,
        }
    }

    /// Attaches a store-assigned identifier.
    #[must_use]
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            user_name: self.user_name,
            account_number: self.account_number,
            email_address: self.email_address,
            identity_number: self.identity_number,
        }
    }
}

/// Partial field replacement for an existing record.
///
/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_number: Option<String>,
}

impl UserPatch {
    /// Returns true when the patch sets no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// The fields this patch sets, with their new values.
    #[must_use]
    pub fn assignments(&self) -> Vec<(UserField, &str)> {
        [
            (UserField::UserName, self.user_name.as_deref()),
            (UserField::AccountNumber, self.account_number.as_deref()),
            (UserField::EmailAddress, self.email_address.as_deref()),
            (UserField::IdentityNumber, self.identity_number.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }

    /// Applies the patch and reports whether any stored value actually changed.
    pub fn apply(&self, user: &mut User) -> bool {
        let mut modified = false;
        for (field, value) in self.assignments() {
            let slot = match field {
                UserField::UserName => &mut user.user_name,
                UserField::AccountNumber => &mut user.account_number,
                UserField::EmailAddress => &mut user.email_address,
                UserField::IdentityNumber => &mut user.identity_number,
            };
            if slot != value {
                *slot = value.to_string();
                modified = true;
            }
        }
        modified
    }
}
