use crate::common::errors::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// One signal of a block's black-box contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Port {
    pub name: String,
    pub direction: Direction,
    pub width: u32,
}

impl Port {
    pub fn input(name: impl Into<String>, width: u32) -> Self {
        Port {
            name: name.into(),
            direction: Direction::In,
            width: width,
        }
    }

    pub fn output(name: impl Into<String>, width: u32) -> Self {
        Port {
            name: name.into(),
            direction: Direction::Out,
            width: width,
        }
    }
}

/// A named design and the ports a synthesis flow would see
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub name: String,
    pub ports: Vec<Port>,
}

impl Entity {
    pub fn to_json(self: &Self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn port(self: &Self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }
}
