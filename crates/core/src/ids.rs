//! Identifier strategies
//!
//! An [`IdStrategy`] is one way of producing primary keys. The set is closed:
//! adding a strategy means adding a variant here plus its arm in
//! [`IdStrategy::generate`], and every table-driven loop in the engine and
//! reporter picks it up from [`IdStrategy::ALL`].

use bson::oid::ObjectId;
use bson::spec::BinarySubtype;
use bson::{Binary, Bson};
use serde::{Serialize, Serializer};
use std::fmt;
use ulid::Ulid;
use uuid::Uuid;

/// Primary-key generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdStrategy {
    /// Store-native 12-byte ObjectId (timestamp + process random + counter)
    ObjectId,
    /// 16-byte ULID: millisecond timestamp followed by 80 random bits
    Ulid,
    /// 16-byte random UUID (version 4)
    Uuid,
}

impl IdStrategy {
    /// Every strategy in reporting order; the first entry is the default baseline
    pub const ALL: [IdStrategy; 3] = [IdStrategy::ObjectId, IdStrategy::Ulid, IdStrategy::Uuid];

    /// Short label used in logs and table headers
    pub fn label(self) -> &'static str {
        match self {
            IdStrategy::ObjectId => "ObjectId",
            IdStrategy::Ulid => "ULID",
            IdStrategy::Uuid => "UUID",
        }
    }

    /// Whether consecutive identifiers sort roughly by creation time
    pub fn is_time_sortable(self) -> bool {
        match self {
            IdStrategy::ObjectId | IdStrategy::Ulid => true,
            IdStrategy::Uuid => false,
        }
    }

    /// Produce one fresh identifier
    ///
    /// Holds no state between calls, so it can be called in a tight loop
    /// millions of times.
    pub fn generate(self) -> Identifier {
        match self {
            IdStrategy::ObjectId => Identifier::ObjectId(ObjectId::new().bytes()),
            IdStrategy::Ulid => Identifier::Binary(Ulid::new().to_bytes()),
            IdStrategy::Uuid => Identifier::Binary(*Uuid::new_v4().as_bytes()),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque fixed-size primary-key value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    /// Store-native id, stored as a BSON ObjectId
    ObjectId([u8; 12]),
    /// 128-bit id, stored as BSON binary with the UUID subtype
    Binary([u8; 16]),
}

impl Identifier {
    /// Raw bytes of the identifier
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Identifier::ObjectId(bytes) => bytes,
            Identifier::Binary(bytes) => bytes,
        }
    }

    /// BSON representation used for the `_id` field and lookup filters
    pub fn to_bson(&self) -> Bson {
        match self {
            Identifier::ObjectId(bytes) => Bson::ObjectId(ObjectId::from_bytes(*bytes)),
            Identifier::Binary(bytes) => Bson::Binary(Binary {
                subtype: BinarySubtype::Uuid,
                bytes: bytes.to_vec(),
            }),
        }
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_bson().serialize(serializer)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
