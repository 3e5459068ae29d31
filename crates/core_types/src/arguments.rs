use std::fmt;

use crate::object::ObjectId;

/// A single bound parameter: one object, or an unordered set of nested arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Argument {
    Object(ObjectId),
    Set(Vec<Argument>),
}

impl Argument {
    /// Identity-based key. Set members are ordered by their own keys, so two sets
    /// that differ only by member order share one key.
    pub fn key(&self) -> String {
        self.render(&mut |id: ObjectId| id.to_string())
    }

    /// Renders the argument with the given object names. Set members are sorted by
    /// their rendered text.
    pub fn render<F>(&self, name: &mut F) -> String
    where
        F: FnMut(ObjectId) -> String,
    {
        match self {
            Self::Object(id) => name(*id),
            Self::Set(items) => {
                let mut parts = items.iter().map(|item| item.render(name)).collect::<Vec<_>>();
                parts.sort();
                format!("{{{}}}", parts.join(","))
            }
        }
    }

    pub fn normalized(&self) -> Argument {
        match self {
            Self::Object(id) => Self::Object(*id),
            Self::Set(items) => {
                let mut items = items.iter().map(Argument::normalized).collect::<Vec<_>>();
                items.sort_by_cached_key(Argument::key);
                Self::Set(items)
            }
        }
    }

    pub fn flatten_into(&self, out: &mut Vec<ObjectId>) {
        match self {
            Self::Object(id) => out.push(*id),
            Self::Set(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }

    pub fn map_objects<F>(&self, f: &mut F) -> Argument
    where
        F: FnMut(ObjectId) -> ObjectId,
    {
        match self {
            Self::Object(id) => Self::Object(f(*id)),
            Self::Set(items) => Self::Set(items.iter().map(|item| item.map_objects(f)).collect()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Arguments(Vec<Argument>);

impl Arguments {
    pub fn new(items: Vec<Argument>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[Argument] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn key(&self) -> String {
        self.0.iter().map(Argument::key).collect::<Vec<_>>().join(",")
    }

    pub fn render<F>(&self, name: &mut F) -> String
    where
        F: FnMut(ObjectId) -> String,
    {
        self.0
            .iter()
            .map(|item| item.render(name))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn normalized(&self) -> Arguments {
        Self(self.0.iter().map(Argument::normalized).collect())
    }

    pub fn flatten(&self) -> Vec<ObjectId> {
        let mut out = Vec::new();
        for item in &self.0 {
            item.flatten_into(&mut out);
        }
        out
    }

    pub fn map_objects<F>(&self, mut f: F) -> Arguments
    where
        F: FnMut(ObjectId) -> ObjectId,
    {
        Self(self.0.iter().map(|item| item.map_objects(&mut f)).collect())
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
