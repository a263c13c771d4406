use serde::{Deserialize, Serialize};
use std::fmt;

/// Database engines recognised from an image name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    Postgres,
    Mysql,
    Redis,
    Mongodb,
    Mariadb,
    Unknown,
}

/// Checked in order, first match wins. `mariadb` images that also contain
/// `mysql` in their name are therefore reported as mysql.
const IMAGE_PATTERNS: [(&str, DatabaseKind); 5] = [
    ("postgres", DatabaseKind::Postgres),
    ("mysql", DatabaseKind::Mysql),
    ("redis", DatabaseKind::Redis),
    ("mongo", DatabaseKind::Mongodb),
    ("mariadb", DatabaseKind::Mariadb),
];

impl DatabaseKind {
    pub fn from_image(image: &str) -> Self {
        let image = image.to_ascii_lowercase();
        IMAGE_PATTERNS
            .iter()
            .find(|(pattern, _)| image.contains(pattern))
            .map(|(_, kind)| *kind)
            .unwrap_or(Self::Unknown)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Environment variables holding the admin user and password
    pub fn credential_vars(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Postgres => Some(("POSTGRES_USER", "POSTGRES_PASSWORD")),
            Self::Mysql | Self::Mariadb => Some(("MYSQL_USER", "MYSQL_PASSWORD")),
            Self::Mongodb => Some(("MONGO_INITDB_ROOT_USERNAME", "MONGO_INITDB_ROOT_PASSWORD")),
            Self::Redis => Some(("REDIS_USER", "REDIS_PASSWORD")),
            Self::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Redis => "redis",
            Self::Mongodb => "mongodb",
            Self::Mariadb => "mariadb",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub name: String,
    /// Id of the container running the image
    pub id: String,
}

/// A running database container and its admin credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseFact {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DatabaseKind,
    pub image: ImageRef,
    pub master_user: Option<String>,
    pub master_password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DatabasesReport {
    pub databases: Vec<DatabaseFact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_images_case_insensitively() {
        assert_eq!(DatabaseKind::from_image("POSTGRES:16"), DatabaseKind::Postgres);
        assert_eq!(DatabaseKind::from_image("bitnami/Redis"), DatabaseKind::Redis);
        assert_eq!(DatabaseKind::from_image("mongo:7"), DatabaseKind::Mongodb);
        assert_eq!(DatabaseKind::from_image("mariadb:11"), DatabaseKind::Mariadb);
    }

    #[test]
    fn first_pattern_wins() {
        assert_eq!(
            DatabaseKind::from_image("custom/postgres-with-redis"),
            DatabaseKind::Postgres
        );
        assert_eq!(
            DatabaseKind::from_image("mariadb-mysql-compat"),
            DatabaseKind::Mysql
        );
    }

    #[test]
    fn unmatched_images_are_unknown() {
        let kind = DatabaseKind::from_image("nginx:alpine");
        assert_eq!(kind, DatabaseKind::Unknown);
        assert!(!kind.is_known());
        assert!(kind.credential_vars().is_none());
    }

    #[test]
    fn mariadb_shares_mysql_variables() {
        assert_eq!(
            DatabaseKind::Mariadb.credential_vars(),
            DatabaseKind::Mysql.credential_vars()
        );
    }

    #[test]
    fn kind_serializes_as_type_field() {
        let fact = DatabaseFact {
            name: "pg".into(),
            kind: DatabaseKind::Postgres,
            image: ImageRef {
                name: "postgres:16".into(),
                id: "abc".into(),
            },
            master_user: Some("admin".into()),
            master_password: None,
        };
        let json = serde_json::to_value(&fact).unwrap();
        assert_eq!(json["type"], "postgres");
        assert_eq!(json["image"]["id"], "abc");
        assert!(json["master_password"].is_null());
    }
}
