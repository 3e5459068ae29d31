use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::arguments::{Argument, Arguments};
use crate::error::ConfigurationError;
use crate::object::{ObjectId, ObjectType};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Parameter {
    Object(ObjectType),
    Set { count: usize, element: Box<Parameter> },
}

impl Parameter {
    pub fn object(object_type: ObjectType) -> Self {
        Self::Object(object_type)
    }

    pub fn set(count: usize, element: Parameter) -> Self {
        Self::Set {
            count,
            element: Box::new(element),
        }
    }

    fn collect_leaf_types(&self, out: &mut Vec<ObjectType>) {
        match self {
            Self::Object(object_type) => out.push(*object_type),
            Self::Set { count, element } => {
                for _ in 0..*count {
                    element.collect_leaf_types(out);
                }
            }
        }
    }

    fn assemble(
        &self,
        picks: &BTreeMap<ObjectType, Vec<ObjectId>>,
        cursors: &mut BTreeMap<ObjectType, usize>,
    ) -> Option<Argument> {
        match self {
            Self::Object(object_type) => {
                let cursor = cursors.entry(*object_type).or_insert(0);
                let id = picks.get(object_type)?.get(*cursor).copied()?;
                *cursor += 1;
                Some(Argument::Object(id))
            }
            Self::Set { count, element } => {
                let mut items = Vec::with_capacity(*count);
                for _ in 0..*count {
                    items.push(element.assemble(picks, cursors)?);
                }
                Some(Argument::Set(items))
            }
        }
    }

    fn validate<F>(
        &self,
        construction: &str,
        argument: &Argument,
        type_of: &mut F,
    ) -> Result<(), ConfigurationError>
    where
        F: FnMut(ObjectId) -> Option<ObjectType>,
    {
        let mismatch = || ConfigurationError::ParameterMismatch {
            construction: construction.to_string(),
            parameter: self.to_string(),
            argument: argument.key(),
        };
        match (self, argument) {
            (Self::Object(expected), Argument::Object(id)) => {
                let actual = type_of(*id).ok_or(ConfigurationError::UnknownObject(*id))?;
                if actual == *expected {
                    Ok(())
                } else {
                    Err(mismatch())
                }
            }
            (Self::Set { count, element }, Argument::Set(items)) => {
                if items.len() != *count {
                    return Err(mismatch());
                }
                for item in items {
                    element.validate(construction, item, type_of)?;
                }
                let distinct = items.iter().map(Argument::key).collect::<HashSet<_>>();
                if distinct.len() != items.len() {
                    return Err(mismatch());
                }
                Ok(())
            }
            _ => Err(mismatch()),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(object_type) => write!(f, "{}", object_type.letter()),
            Self::Set { count, element } => {
                let inner = (0..*count).map(|_| element.to_string()).collect::<Vec<_>>();
                write!(f, "{{{}}}", inner.join(","))
            }
        }
    }
}

/// Ordered parameter list of a construction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Signature(Vec<Parameter>);

impl Signature {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self(parameters)
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.0
    }

    /// Types of the flattened leaves, in traversal order.
    pub fn leaf_types(&self) -> Vec<ObjectType> {
        let mut out = Vec::new();
        for parameter in &self.0 {
            parameter.collect_leaf_types(&mut out);
        }
        out
    }

    pub fn type_counts(&self) -> BTreeMap<ObjectType, usize> {
        let mut counts = BTreeMap::new();
        for object_type in self.leaf_types() {
            *counts.entry(object_type).or_insert(0) += 1;
        }
        counts
    }

    /// Builds an argument tree, consuming the picked objects of each type left to right
    /// as the signature asks for them. `None` when a type runs out of picks.
    pub fn assemble(&self, picks: &BTreeMap<ObjectType, Vec<ObjectId>>) -> Option<Arguments> {
        let mut cursors = BTreeMap::new();
        let mut items = Vec::with_capacity(self.0.len());
        for parameter in &self.0 {
            items.push(parameter.assemble(picks, &mut cursors)?);
        }
        Some(Arguments::new(items))
    }

    pub fn validate<F>(
        &self,
        construction: &str,
        arguments: &Arguments,
        mut type_of: F,
    ) -> Result<(), ConfigurationError>
    where
        F: FnMut(ObjectId) -> Option<ObjectType>,
    {
        if arguments.len() != self.0.len() {
            return Err(ConfigurationError::ArgumentCount {
                construction: construction.to_string(),
                expected: self.0.len(),
                actual: arguments.len(),
            });
        }
        for (parameter, argument) in self.0.iter().zip(arguments.items()) {
            parameter.validate(construction, argument, &mut type_of)?;
        }
        let leaves = arguments.flatten();
        let distinct = leaves.iter().collect::<HashSet<_>>();
        if distinct.len() != leaves.len() {
            return Err(ConfigurationError::ParameterMismatch {
                construction: construction.to_string(),
                parameter: self.to_string(),
                argument: arguments.key(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self.0.iter().map(Parameter::to_string).collect::<Vec<_>>();
        f.write_str(&parts.join(","))
    }
}
