//! Reading datasets and attributes into [`Value`]s.
//!
//! A source of a non-compound type is read in full as a single column. A source of a compound type
//! is read one member at a time: the memory type passed to HDF5 is a compound holding only that
//! member, so the library projects the member out of every record. The members are assembled into
//! a table in declaration order.
use std::ffi::CString;
use std::path::Path;

use anyhow::Context;
use hdf5::types::{CompoundField, CompoundType, TypeDescriptor};
use hdf5::{Datatype, File};
use hdf5_sys::h5o::H5Oexists_by_name;
use hdf5_sys::h5p::H5P_DEFAULT;

use crate::types::{ColumnKind, Kind, Member, QType};
use crate::value::{Column, Value};

mod numeric;
pub mod source;
mod strings;

pub use source::Source;

/// Memory type for values of `desc`. When reading a member of a compound type the values are
/// wrapped in a single-member compound named `member`.
fn memtype(desc: &TypeDescriptor, member: Option<&str>) -> Result<Datatype, anyhow::Error> {
    let desc = match member {
        None => desc.clone(),
        Some(name) => TypeDescriptor::Compound(CompoundType {
            fields: vec![CompoundField {
                name: name.to_string(),
                ty: desc.clone(),
                offset: 0,
                index: 0,
            }],
            size: desc.size(),
        }),
    };

    Ok(Datatype::from_descriptor(&desc)?)
}

/// Read all values of a dataset or attribute.
pub fn read(src: &Source) -> Result<Value, anyhow::Error> {
    let desc = src.dtype()?.to_descriptor()?;
    let kind = Kind::classify(&desc)?;

    let space = src.space()?;

    debug!(
        "reading {} points as {} (shape: {:?})",
        space.size(),
        kind.qtype(),
        space.shape()
    );

    match kind {
        Kind::Compound(members) => read_compound(src, &members),
        Kind::Column(kind) => Ok(Value::Array {
            shape: space.shape(),
            column: read_column(src, &kind, &desc, None)?,
        }),
    }
}

fn read_column(
    src: &Source,
    kind: &ColumnKind,
    desc: &TypeDescriptor,
    member: Option<&str>,
) -> Result<Column, anyhow::Error> {
    match kind {
        ColumnKind::FixedString(sz) => strings::read_fixed(src, desc, *sz, member).map(Column::Text),
        ColumnKind::VarString => strings::read_varlen(src, desc, member).map(Column::Text),
        kind => numeric::read_column(src, kind, member),
    }
}

fn read_compound(src: &Source, members: &[Member]) -> Result<Value, anyhow::Error> {
    members
        .iter()
        .map(|m| {
            read_column(src, &m.kind, &m.desc, Some(&m.name))
                .map(|c| (m.name.clone(), c))
                .with_context(|| format!("error reading member `{}`", m.name))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Table)
}

fn open(path: &Path) -> Result<File, anyhow::Error> {
    let hf = File::open(path).context("error opening file")?;
    debug!("opened {}", path.display());

    Ok(hf)
}

/// Read a dataset.
pub fn read_dataset<P>(path: P, dataset: &str) -> Result<Value, anyhow::Error>
where
    P: AsRef<Path>,
{
    let hf = open(path.as_ref())?;
    read(&Source::dataset(&hf, dataset)?)
}

/// Read an attribute attached to a dataset or a group.
pub fn read_attribute<P>(path: P, object: &str, attribute: &str) -> Result<Value, anyhow::Error>
where
    P: AsRef<Path>,
{
    let hf = open(path.as_ref())?;
    read(&Source::attribute(&hf, object, attribute)?)
}

pub fn dataset_shape<P>(path: P, dataset: &str) -> Result<Vec<usize>, anyhow::Error>
where
    P: AsRef<Path>,
{
    let hf = open(path.as_ref())?;
    Source::dataset(&hf, dataset)?.shape()
}

pub fn attribute_shape<P>(path: P, object: &str, attribute: &str) -> Result<Vec<usize>, anyhow::Error>
where
    P: AsRef<Path>,
{
    let hf = open(path.as_ref())?;
    Source::attribute(&hf, object, attribute)?.shape()
}

/// The q type [`read_dataset`] produces for this dataset.
pub fn dataset_qtype<P>(path: P, dataset: &str) -> Result<QType, anyhow::Error>
where
    P: AsRef<Path>,
{
    let hf = open(path.as_ref())?;
    let dtype = Source::dataset(&hf, dataset)?.dtype()?;

    Ok(Kind::try_from(&dtype)?.qtype())
}

/// Whether a dataset, group or named datatype exists at `name`. Soft links that do not resolve
/// to an object are not objects.
pub fn is_object<P>(path: P, name: &str) -> Result<bool, anyhow::Error>
where
    P: AsRef<Path>,
{
    let hf = open(path.as_ref())?;

    if name == "/" {
        return Ok(true);
    }

    // H5Oexists_by_name fails on missing intermediate groups, so check the link first.
    if !hf.link_exists(name) {
        return Ok(false);
    }

    let cname = CString::new(name).context("invalid object name")?;
    let e = hdf5::sync::sync(|| unsafe {
        H5Oexists_by_name(hf.id(), cname.as_ptr(), H5P_DEFAULT)
    });
    ensure!(e >= 0, "error checking object {}", name);

    Ok(e > 0)
}
