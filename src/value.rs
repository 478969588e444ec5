//! Values read from HDF5, laid out the way q will hold them.
use crate::types::QType;

/// A flat vector of values of one q type.
#[derive(Debug, PartialEq, Clone)]
pub enum Column {
    Boolean(Vec<bool>),
    Byte(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Real(Vec<f32>),
    Float(Vec<f64>),
    Symbol(Vec<String>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        use Column::*;

        match self {
            Boolean(v) => v.len(),
            Byte(v) => v.len(),
            Short(v) => v.len(),
            Int(v) => v.len(),
            Long(v) => v.len(),
            Real(v) => v.len(),
            Float(v) => v.len(),
            Symbol(v) | Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn qtype(&self) -> QType {
        use Column::*;

        match self {
            Boolean(_) => QType::Boolean,
            Byte(_) => QType::Byte,
            Short(_) => QType::Short,
            Int(_) => QType::Int,
            Long(_) => QType::Long,
            Real(_) => QType::Real,
            Float(_) => QType::Float,
            Symbol(_) => QType::Symbol,
            Text(_) => QType::Mixed,
        }
    }
}

/// The contents of a dataset or an attribute.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    /// Values of a non-compound type in row-major order, with the shape of the dataspace. A
    /// scalar dataspace has an empty shape and one value, a null dataspace an
    /// empty shape and no values.
    Array { shape: Vec<usize>, column: Column },

    /// One named column per member of a compound type, in member order.
    Table(Vec<(String, Column)>),
}

impl Value {
    pub fn qtype(&self) -> QType {
        match self {
            Value::Array { column, .. } => column.qtype(),
            Value::Table(_) => QType::Table,
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        match self {
            Value::Array { .. } => None,
            Value::Table(cols) => cols.iter().find(|(n, _)| n == name).map(|(_, c)| c),
        }
    }
}
