use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// Defined in core because configuration selects the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// The two logical buckets objects are uploaded to.
///
/// `Server` holds processed assets served by the application, `Storage` holds
/// archived originals. Each kind owns a fixed key prefix.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
    utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum BucketKind {
    #[default]
    Server,
    Storage,
}

impl BucketKind {
    /// Key prefix every object of this bucket lives under
    pub fn prefix(&self) -> &'static str {
        match self {
            BucketKind::Server => "assets/",
            BucketKind::Storage => "images/assets/",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BucketKind::Server => "server",
            BucketKind::Storage => "storage",
        }
    }
}

impl FromStr for BucketKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "server" => Ok(BucketKind::Server),
            "storage" => Ok(BucketKind::Storage),
            _ => Err(anyhow::anyhow!(
                "Invalid bucket type: {} (expected 'server' or 'storage')",
                s
            )),
        }
    }
}

impl Display for BucketKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_kind_parse() {
        assert_eq!("server".parse::<BucketKind>().unwrap(), BucketKind::Server);
        assert_eq!(" Storage ".parse::<BucketKind>().unwrap(), BucketKind::Storage);
        assert!("archive".parse::<BucketKind>().is_err());
    }

    #[test]
    fn test_bucket_prefixes() {
        assert_eq!(BucketKind::Server.prefix(), "assets/");
        assert_eq!(BucketKind::Storage.prefix(), "images/assets/");
    }

    #[test]
    fn test_storage_backend_roundtrip_display() {
        assert_eq!("LOCAL".parse::<StorageBackend>().unwrap(), StorageBackend::Local);
        assert_eq!(StorageBackend::S3.to_string(), "s3");
    }
}
