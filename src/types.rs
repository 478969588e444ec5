//! Classification of HDF5 datatypes into the q types their values are read as.
use std::fmt;

use hdf5::types::{CompoundField, EnumType, FloatSize, IntSize, TypeDescriptor};

/// q datatypes produced by the reader, with their type codes as used by the C API.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum QType {
    Mixed,
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Real,
    Float,
    Char,
    Symbol,
    Table,
}

impl QType {
    /// Type code of a vector of this type (negate for the atom).
    pub fn code(&self) -> i8 {
        use QType::*;

        match self {
            Mixed => 0,
            Boolean => 1,
            Byte => 4,
            Short => 5,
            Int => 6,
            Long => 7,
            Real => 8,
            Float => 9,
            Char => 10,
            Symbol => 11,
            Table => 98,
        }
    }

    pub fn name(&self) -> &'static str {
        use QType::*;

        match self {
            Mixed => "mixed",
            Boolean => "boolean",
            Byte => "byte",
            Short => "short",
            Int => "int",
            Long => "long",
            Real => "real",
            Float => "float",
            Char => "char",
            Symbol => "symbol",
            Table => "table",
        }
    }
}

impl fmt::Display for QType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A datatype that can be read into a single q vector.
#[derive(Debug, PartialEq, Clone)]
pub enum ColumnKind {
    Boolean,
    Int(IntSize),
    UInt(IntSize),
    Float(FloatSize),
    FixedString(usize),
    VarString,
    Enum(EnumType),
}

impl ColumnKind {
    pub fn qtype(&self) -> QType {
        use ColumnKind::*;

        match self {
            Boolean => QType::Boolean,
            Int(IntSize::U1) | UInt(IntSize::U1) => QType::Byte,
            Int(IntSize::U2) => QType::Short,
            Int(IntSize::U4) | UInt(IntSize::U2) => QType::Int,
            Int(IntSize::U8) | UInt(IntSize::U4) | UInt(IntSize::U8) => QType::Long,
            Float(FloatSize::U4) => QType::Real,
            Float(_) => QType::Float,
            FixedString(_) | VarString => QType::Mixed,
            Enum(_) => QType::Symbol,
        }
    }

    fn classify(desc: &TypeDescriptor) -> Result<ColumnKind, anyhow::Error> {
        use TypeDescriptor as TD;

        Ok(match desc {
            TD::Boolean => ColumnKind::Boolean,
            TD::Integer(sz) => ColumnKind::Int(*sz),
            TD::Unsigned(sz) => ColumnKind::UInt(*sz),
            TD::Float(sz @ (FloatSize::U4 | FloatSize::U8)) => ColumnKind::Float(*sz),
            TD::FixedAscii(sz) | TD::FixedUnicode(sz) => ColumnKind::FixedString(*sz),
            TD::VarLenAscii | TD::VarLenUnicode => ColumnKind::VarString,
            TD::Enum(e) => ColumnKind::Enum(e.clone()),
            _ => return Err(anyhow!("unsupported datatype: {:?}", desc)),
        })
    }
}

/// Top-level shape of a datatype: a struct of named members or a single column.
#[derive(Debug, PartialEq, Clone)]
pub enum Kind {
    Compound(Vec<Member>),
    Column(ColumnKind),
}

/// A member of a compound datatype.
#[derive(Debug, PartialEq, Clone)]
pub struct Member {
    pub name: String,

    /// Descriptor of the member as stored, used to build the projecting memory type.
    pub desc: TypeDescriptor,
    pub kind: ColumnKind,
}

impl Kind {
    pub fn classify(desc: &TypeDescriptor) -> Result<Kind, anyhow::Error> {
        match desc {
            TypeDescriptor::Compound(ct) => {
                let mut fields: Vec<&CompoundField> = ct.fields.iter().collect();
                fields.sort_by_key(|f| f.index);

                fields
                    .into_iter()
                    .map(|f| {
                        ColumnKind::classify(&f.ty)
                            .map(|kind| Member {
                                name: f.name.clone(),
                                desc: f.ty.clone(),
                                kind,
                            })
                            .map_err(|e| e.context(format!("member `{}`", f.name)))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Kind::Compound)
            }
            desc => ColumnKind::classify(desc).map(Kind::Column),
        }
    }

    pub fn qtype(&self) -> QType {
        match self {
            Kind::Compound(_) => QType::Table,
            Kind::Column(c) => c.qtype(),
        }
    }
}

impl TryFrom<&hdf5::Datatype> for Kind {
    type Error = anyhow::Error;

    fn try_from(dtype: &hdf5::Datatype) -> Result<Kind, anyhow::Error> {
        Kind::classify(&dtype.to_descriptor()?)
    }
}
