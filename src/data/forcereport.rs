// src/data/forcereport.rs

//! Implements [`ForceReport`] and the nested tables within it,
//! [`ForceBlock`], [`ForceGroup`], [`ZoneTable`], and leaf [`Value`].
//!
//! A `ForceReport` is an ordered mapping:
//!
//! ```text
//! block name → group name → force-type name → zone name → Value
//! ```
//!
//! e.g. `"Forces - Direction Vector (1 0 0)"` → `"Forces (n)"` →
//! `"Pressure"` → `"wall"` → `12.3`.
//!
//! All mappings preserve insertion order, which is the order of appearance in
//! the report file. The tables are filled only by a [`ForceTableParser`] and
//! are read-only afterward.
//!
//! [`ForceTableParser`]: crate::readers::forcetableparser::ForceTableParser

use std::ops::Index;

use ::indexmap::IndexMap;
use ::serde::Serialize;

/// Name of a block, e.g. `"Forces - Direction Vector (1 0 0)"`.
pub type BlockName = String;
/// Name of a group, e.g. `"Forces (n)"` or `"Coefficients"`.
pub type GroupName = String;
/// Name of a force-type column, e.g. `"Pressure"`.
pub type ForceTypeName = String;
/// Name of a mesh zone, e.g. `"wall"`.
pub type ZoneName = String;

/// Block name of the one untitled block of a single-block report.
pub const BLOCK_NAME_SINGLE: &str = "default";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Value
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One table cell of a force report.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    /// Fixed-length vector, e.g. a center of pressure `(x y z)`.
    Vector(Vec<f64>),
}

impl Value {
    /// Count of components; `1` for a `Scalar`.
    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::Vector(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn is_vector(&self) -> bool {
        matches!(self, Value::Vector(_))
    }

    /// The scalar, or `None` for a `Vector`.
    pub const fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(f) => Some(*f),
            Value::Vector(_) => None,
        }
    }

    /// Component `index`; a `Scalar` has only component `0`.
    pub fn component(
        &self,
        index: usize,
    ) -> Option<f64> {
        match self {
            Value::Scalar(f) if index == 0 => Some(*f),
            Value::Scalar(_) => None,
            Value::Vector(v) => v.get(index).copied(),
        }
    }

    /// All components in order.
    pub fn components(&self) -> Vec<f64> {
        match self {
            Value::Scalar(f) => vec![*f],
            Value::Vector(v) => v.clone(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// tables
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Implement the read-only accessors shared by the nested tables.
macro_rules! impl_table {
    ($table:ident, $key:ty, $val:ty) => {
        impl $table {
            pub fn new() -> $table {
                $table(IndexMap::new())
            }

            pub fn get(
                &self,
                key: &str,
            ) -> Option<&$val> {
                self.0.get(key)
            }

            pub fn contains_key(
                &self,
                key: &str,
            ) -> bool {
                self.0.contains_key(key)
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Keys in order of appearance.
            pub fn keys(&self) -> impl Iterator<Item = &$key> {
                self.0.keys()
            }

            /// Entries in order of appearance.
            pub fn iter(&self) -> impl Iterator<Item = (&$key, &$val)> {
                self.0.iter()
            }

            pub(crate) fn insert(
                &mut self,
                key: $key,
                val: $val,
            ) -> Option<$val> {
                self.0.insert(key, val)
            }

            pub(crate) fn get_mut(
                &mut self,
                key: &str,
            ) -> Option<&mut $val> {
                self.0.get_mut(key)
            }
        }

        impl Index<&str> for $table {
            type Output = $val;

            /// Panics if `key` is not present.
            fn index(
                &self,
                key: &str,
            ) -> &$val {
                &self.0[key]
            }
        }
    };
}

/// Zone name → [`Value`], for one force-type of one group.
///
/// Zone names are unique within the table. Every value of the table has the
/// same length.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ZoneTable(IndexMap<ZoneName, Value>);

impl_table!(ZoneTable, ZoneName, Value);

/// Force-type name → [`ZoneTable`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForceGroup(IndexMap<ForceTypeName, ZoneTable>);

impl_table!(ForceGroup, ForceTypeName, ZoneTable);

/// Group name → [`ForceGroup`].
///
/// Within one `ForceBlock` every `ForceGroup` has the same force-type keys and
/// every `ZoneTable` has the same zone keys.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForceBlock(IndexMap<GroupName, ForceGroup>);

impl_table!(ForceBlock, GroupName, ForceGroup);

impl ForceBlock {
    /// `true` if every group has the same force-type keys in the same order,
    /// and every zone table has the same zone keys in the same order.
    pub fn is_rectangular(&self) -> bool {
        let mut force_types: Option<Vec<&ForceTypeName>> = None;
        let mut zones: Option<Vec<&ZoneName>> = None;
        for group in self.0.values() {
            let force_types_: Vec<&ForceTypeName> = group.keys().collect();
            match &force_types {
                Some(expect) if *expect != force_types_ => return false,
                Some(_) => {}
                None => force_types = Some(force_types_),
            }
            for table in group.0.values() {
                let zones_: Vec<&ZoneName> = table.keys().collect();
                match &zones {
                    Some(expect) if *expect != zones_ => return false,
                    Some(_) => {}
                    None => zones = Some(zones_),
                }
            }
        }

        true
    }

    /// Zone names in order of appearance.
    pub fn zones(&self) -> Vec<&ZoneName> {
        self.0
            .values()
            .next()
            .and_then(|group| group.0.values().next())
            .map(|table| table.keys().collect())
            .unwrap_or_default()
    }

    /// Lookup one cell.
    pub fn value(
        &self,
        group: &str,
        force_type: &str,
        zone: &str,
    ) -> Option<&Value> {
        self.get(group)?.get(force_type)?.get(zone)
    }
}

/// Block name → [`ForceBlock`]; the result of parsing one force report file.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForceReport(IndexMap<BlockName, ForceBlock>);

impl_table!(ForceReport, BlockName, ForceBlock);

impl ForceReport {
    /// Lookup one cell.
    pub fn value(
        &self,
        block: &str,
        group: &str,
        force_type: &str,
        zone: &str,
    ) -> Option<&Value> {
        self.get(block)?.value(group, force_type, zone)
    }

    /// Every cell as a tuple
    /// `(block, group, force-type, zone, value)`, in order of appearance.
    pub fn cells(&self) -> Vec<(&BlockName, &GroupName, &ForceTypeName, &ZoneName, &Value)> {
        let mut cells = Vec::new();
        for (block_name, block) in self.iter() {
            for (group_name, group) in block.iter() {
                for (force_type, table) in group.iter() {
                    for (zone, value) in table.iter() {
                        cells.push((block_name, group_name, force_type, zone, value));
                    }
                }
            }
        }

        cells
    }
}
