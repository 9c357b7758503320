//! Decoded Lua data: scalars and ordered tables.

use std::fmt;

/// Table key. KOReader writes `["name"] = …`, `[1] = …`, bare `name = …`
/// or positional values (which get implicit 1-based integer keys).
#[derive(Debug, Clone, PartialEq)]
pub enum LuaKey {
    Int(i64),
    Str(String),
}

impl fmt::Display for LuaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuaKey::Int(i) => write!(f, "[{i}]"),
            LuaKey::Str(s) => write!(f, "{s:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LuaValue {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Entries in source order.
    Table(Vec<(LuaKey, LuaValue)>),
}

impl LuaValue {
    /// Look up a string key in a table. `None` for non-tables too.
    pub fn get(&self, key: &str) -> Option<&LuaValue> {
        match self {
            LuaValue::Table(entries) => entries.iter().find_map(|(k, v)| match k {
                LuaKey::Str(s) if s == key => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }

    /// Walk a dotted path of string keys, e.g. `doc_props.language`.
    pub fn path(&self, dotted: &str) -> Option<&LuaValue> {
        dotted
            .split('.')
            .try_fold(self, |cur, part| cur.get(part))
    }

    /// First child of a table in source order.
    pub fn first_child(&self) -> Option<&LuaValue> {
        match self {
            LuaValue::Table(entries) => entries.first().map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LuaValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view; floats are truncated.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            LuaValue::Int(i) => Some(*i),
            LuaValue::Float(f) if f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }
}
