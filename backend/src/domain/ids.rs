//! UUID-backed identifiers for passport entities.
//!
//! Each identifier is a distinct type so a UID id can never be passed where
//! an experience id is expected.

macro_rules! define_uuid_id {
    (
        $(#[$outer:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(value: ::uuid::Uuid) -> Self {
                Self(value)
            }
        }
    };
}

define_uuid_id! {
    /// Identifier of an [`crate::domain::Experience`].
    pub struct ExperienceId;
}

define_uuid_id! {
    /// Identifier of an [`crate::domain::ExperienceUid`] row (not its token).
    pub struct ExperienceUidId;
}

define_uuid_id! {
    /// Identifier of a [`crate::domain::Registration`].
    pub struct RegistrationId;
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn display_matches_inner_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(ExperienceId::from_uuid(uuid).to_string(), uuid.to_string());
    }

    #[test]
    fn serialises_transparently() {
        let uuid = Uuid::nil();
        let value = serde_json::to_value(RegistrationId::from(uuid)).expect("serialise");
        assert_eq!(value, serde_json::json!(uuid.to_string()));
    }
}
