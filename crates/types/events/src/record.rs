use crate::SkipReason;
use crate::amount::WeiAmount;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::Display;

/// Which kind of upstream produced a record
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    /// Smoothing pool oracle block feeds, dispatched on `block_type`
    #[default]
    Oracle,
    /// Donations feed
    Donations,
}

/// One raw record as returned by a feed. Field presence varies with the event kind.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EventRecord(Map<String, Value>);

impl EventRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// First non-null value among `keys`, with the key that matched
    pub fn lookup(&self, keys: &[&'static str]) -> Option<(&'static str, &Value)> {
        keys.iter().find_map(|key| match self.0.get(*key) {
            Some(Value::Null) | None => None,
            Some(value) => Some((*key, value)),
        })
    }

    pub fn has_any(&self, keys: &[&'static str]) -> bool {
        self.lookup(keys).is_some()
    }

    /// Unsigned integer given either as a JSON number or a decimal string
    pub fn u64_field(&self, keys: &[&'static str]) -> Result<u64, SkipReason> {
        let (key, value) = self.lookup(keys).ok_or(SkipReason::MissingField(keys[0]))?;
        match value {
            Value::Number(n) => n.as_u64().ok_or(SkipReason::MalformedField(key)),
            Value::String(s) => s.trim().parse::<u64>().map_err(|_| SkipReason::MalformedField(key)),
            _ => Err(SkipReason::MalformedField(key)),
        }
    }

    pub fn str_field(&self, keys: &[&'static str]) -> Result<&str, SkipReason> {
        let (key, value) = self.lookup(keys).ok_or(SkipReason::MissingField(keys[0]))?;
        match value {
            Value::String(s) if !s.trim().is_empty() => Ok(s.trim()),
            _ => Err(SkipReason::MalformedField(key)),
        }
    }

    /// Wei amount given as a decimal string or an integral JSON number
    pub fn wei_field(&self, keys: &[&'static str]) -> Result<WeiAmount, SkipReason> {
        let (key, value) = self.lookup(keys).ok_or(SkipReason::MissingField(keys[0]))?;
        let parsed = match value {
            Value::String(s) => s.parse::<WeiAmount>(),
            Value::Number(n) => n.to_string().parse::<WeiAmount>(),
            _ => return Err(SkipReason::MalformedField(key)),
        };
        parsed.map_err(|_| SkipReason::MalformedField(key))
    }
}

impl From<Map<String, Value>> for EventRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for EventRecord {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}
