use std::collections::HashMap;

use hdf5::types::{EnumType, FloatSize, IntSize, TypeDescriptor};
use hdf5::H5Type;

use super::{memtype, Source};
use crate::types::ColumnKind;
use crate::value::Column;

/// Read values as the native type `T`, letting HDF5 convert from the stored type.
fn read<T: H5Type + Copy>(src: &Source, member: Option<&str>) -> Result<Vec<T>, anyhow::Error> {
    src.read_as::<T>(&memtype(&T::type_descriptor(), member)?)
}

/// Read a numeric, boolean or enum column.
pub fn read_column(
    src: &Source,
    kind: &ColumnKind,
    member: Option<&str>,
) -> Result<Column, anyhow::Error> {
    use ColumnKind::*;
    use IntSize::*;

    Ok(match kind {
        Boolean => Column::Boolean(read_bool(src, member)?),
        Int(U1) => Column::Byte(read::<i8>(src, member)?.into_iter().map(|v| v as u8).collect()),
        UInt(U1) => Column::Byte(read::<u8>(src, member)?),
        Int(U2) => Column::Short(read::<i16>(src, member)?),
        UInt(U2) => Column::Int(read::<u16>(src, member)?.into_iter().map(i32::from).collect()),
        Int(U4) => Column::Int(read::<i32>(src, member)?),
        UInt(U4) => Column::Long(read::<u32>(src, member)?.into_iter().map(i64::from).collect()),
        Int(U8) => Column::Long(read::<i64>(src, member)?),
        UInt(U8) => Column::Long(read::<u64>(src, member)?.into_iter().map(|v| v as i64).collect()),
        Float(FloatSize::U4) => Column::Real(read::<f32>(src, member)?),
        Float(_) => Column::Float(read::<f64>(src, member)?),
        Enum(e) => Column::Symbol(read_enum(src, e, member)?),
        FixedString(_) | VarString => bail!("not a numeric type: {:?}", kind),
    })
}

/// Read booleans as bytes. Stored values other than FALSE and TRUE are true.
fn read_bool(src: &Source, member: Option<&str>) -> Result<Vec<bool>, anyhow::Error> {
    let bytes = src.read_as::<u8>(&memtype(&bool::type_descriptor(), member)?)?;

    Ok(bytes.into_iter().map(|v| v != 0).collect())
}

/// Read enum values and map them to member names. Values without a member become empty.
fn read_enum(
    src: &Source,
    e: &EnumType,
    member: Option<&str>,
) -> Result<Vec<String>, anyhow::Error> {
    let mt = memtype(&TypeDescriptor::Enum(e.clone()), member)?;
    let sz = mt.size();
    ensure!((1..=8).contains(&sz), "unsupported enum size: {}", sz);

    // Member values are held in the leading bytes of a u64, the way HDF5 hands them out.
    let names: HashMap<u64, &str> = e
        .members
        .iter()
        .map(|m| (m.value, m.name.as_str()))
        .collect();

    let bytes = src.read_as::<u8>(&mt)?;

    Ok(bytes
        .chunks_exact(sz)
        .map(|c| {
            let mut v = [0u8; 8];
            v[..sz].copy_from_slice(c);
            names
                .get(&u64::from_ne_bytes(v))
                .map(|n| n.to_string())
                .unwrap_or_default()
        })
        .collect())
}
