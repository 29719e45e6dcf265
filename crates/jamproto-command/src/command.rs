use bytes::Bytes;
use ciborium::Value;

use crate::argument::Argument;
use crate::signature::Signature;
use crate::wire::FIELD_KEYS;

/// Remote procedure call.
pub const RPC: &str = "RPC";
/// Liveness probe.
pub const PING: &str = "PING";
/// Node registration.
pub const REGISTER: &str = "REGISTER";

/// Activity id meaning "not part of an activity".
pub const NO_ACTIVITY: &str = "0";

/// One protocol message.
///
/// A command is immutable once built. It owns its fields, its arguments and
/// its serialized form; the serialized bytes are an independent copy and
/// never share storage with the argument payloads.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    option: String,
    activity_name: String,
    activity_id: String,
    arguments: Vec<Argument>,
    serialized: Bytes,
}

impl Command {
    pub(crate) fn assemble(
        name: String,
        option: String,
        activity_name: String,
        activity_id: String,
        arguments: Vec<Argument>,
        serialized: Bytes,
    ) -> Self {
        Self {
            name,
            option,
            activity_name,
            activity_id,
            arguments,
            serialized,
        }
    }

    /// The command verb, e.g. `RPC`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn option(&self) -> &str {
        &self.option
    }

    pub fn activity_name(&self) -> &str {
        &self.activity_name
    }

    /// String-encoded 64-bit activity id. `"0"` means no activity.
    pub fn activity_id(&self) -> &str {
        &self.activity_id
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn argument(&self, index: usize) -> Option<&Argument> {
        self.arguments.get(index)
    }

    pub fn nargs(&self) -> usize {
        self.arguments.len()
    }

    /// Signature of the argument list.
    pub fn signature(&self) -> Signature {
        Signature::of(&self.arguments)
    }

    /// The cached wire encoding, ready for the transport.
    pub fn as_bytes(&self) -> &[u8] {
        &self.serialized
    }

    /// A cheap handle to the cached wire encoding.
    pub fn bytes(&self) -> Bytes {
        self.serialized.clone()
    }

    pub fn into_bytes(self) -> Bytes {
        self.serialized
    }

    /// Length of the serialized form in bytes.
    pub fn len(&self) -> usize {
        self.serialized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serialized.is_empty()
    }

    /// Structured CBOR representation of this command.
    ///
    /// Built from the owned fields on each call. Integers carry their true
    /// value, so this is for introspection and not a wire-exact mirror.
    pub fn to_value(&self) -> Value {
        let header = [
            &self.name,
            &self.option,
            &self.activity_name,
            &self.activity_id,
        ];
        let mut entries: Vec<(Value, Value)> = FIELD_KEYS
            .iter()
            .zip(header)
            .map(|(key, value)| (Value::Text((*key).to_owned()), Value::Text(value.clone())))
            .collect();

        let args = self
            .arguments
            .iter()
            .map(|arg| match arg {
                Argument::Int(v) => Value::Integer((*v).into()),
                Argument::Str(s) => Value::Text(s.clone()),
                Argument::Double(v) => Value::Float(*v),
                Argument::Bytes(b) => Value::Bytes(b.to_vec()),
            })
            .collect();
        entries.push((Value::Text(FIELD_KEYS[4].to_owned()), Value::Array(args)));

        Value::Map(entries)
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.option == other.option
            && self.activity_name == other.activity_name
            && self.activity_id == other.activity_id
            && self.arguments == other.arguments
    }
}
