//! Serialization and Deserialization for the state envelope and the protocol messages

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};


/// Serializes any protocol message into a binary format.
///
/// Uses `bincode` for efficient serialization.
///
/// ## Parameters
/// - `msg`: A reference to the message to be serialized.
///
/// ## Returns
/// - A `Vec<u8>` containing the serialized data, or the bincode error with context.
pub fn serialize<T: Serialize>(msg: &T) -> anyhow::Result<Vec<u8>> {
    bincode::serialize(msg)
        .with_context(|| format!("Serialization of {} failed", std::any::type_name::<T>()))
}

/// Deserializes a protocol message from a binary format.
///
/// ## Parameters
/// - `data`: A byte slice (`&[u8]`) containing the serialized message.
///
/// ## Returns
/// - The message reconstructed from the binary data, or the bincode error with context.
pub fn deserialize<T: DeserializeOwned>(data: &[u8]) -> anyhow::Result<T> {
    bincode::deserialize(data)
        .with_context(|| format!("Deserialization of {} failed ({} bytes)", std::any::type_name::<T>(), data.len()))
}
