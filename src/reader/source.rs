use std::mem;

use anyhow::Context;
use hdf5::{Attribute, Container, Dataset, Dataspace, Datatype, File};
use hdf5_sys::h5a::H5Aread;
use hdf5_sys::h5d::H5Dread;
use hdf5_sys::h5p::H5P_DEFAULT;
use hdf5_sys::h5s::H5S_ALL;
use libc::c_void;

/// An open dataset or attribute to read values from.
///
/// Both are read in full: datasets through `H5Dread` with the whole selection, attributes
/// through `H5Aread`.
pub enum Source {
    Dataset(Dataset),
    Attribute(Attribute),
}

impl Source {
    pub fn dataset(file: &File, name: &str) -> Result<Source, anyhow::Error> {
        let ds = file.dataset(name).context("error opening dataset")?;
        debug!("opened dataset {}", ds.name());

        Ok(Source::Dataset(ds))
    }

    /// Open attribute `name` attached to `object`, which may be a dataset or a group.
    pub fn attribute(file: &File, object: &str, name: &str) -> Result<Source, anyhow::Error> {
        let attr = match file.dataset(object) {
            Ok(ds) => ds.attr(name),
            Err(_) => file
                .group(object)
                .context("error opening dataset/group")?
                .attr(name),
        }
        .context("error opening attribute")?;
        debug!("opened attribute {} on {}", name, object);

        Ok(Source::Attribute(attr))
    }

    pub fn container(&self) -> &Container {
        match self {
            Source::Dataset(ds) => &**ds,
            Source::Attribute(attr) => &**attr,
        }
    }

    fn what(&self) -> &'static str {
        match self {
            Source::Dataset(_) => "dataset",
            Source::Attribute(_) => "attribute",
        }
    }

    pub fn dtype(&self) -> Result<Datatype, anyhow::Error> {
        self.container()
            .dtype()
            .with_context(|| format!("error retrieving {} type", self.what()))
    }

    pub fn space(&self) -> Result<Dataspace, anyhow::Error> {
        self.container()
            .space()
            .context("error opening dataspace")
    }

    /// Dimensions of the dataspace. Empty for scalar and null dataspaces.
    pub fn shape(&self) -> Result<Vec<usize>, anyhow::Error> {
        Ok(self.space()?.shape())
    }

    /// Number of points in the dataspace: 1 for a scalar, 0 for a null dataspace.
    pub fn size(&self) -> Result<usize, anyhow::Error> {
        Ok(self.space()?.size())
    }

    /// Read all points, converted to `memtype`, into `buf`.
    ///
    /// # Safety
    ///
    /// `buf` must have room for `self.size()? * memtype.size()` bytes.
    pub unsafe fn read_into(&self, memtype: &Datatype, buf: *mut c_void) -> Result<(), anyhow::Error> {
        let e = hdf5::sync::sync(|| match self {
            Source::Dataset(ds) => H5Dread(ds.id(), memtype.id(), H5S_ALL, H5S_ALL, H5P_DEFAULT, buf),
            Source::Attribute(attr) => H5Aread(attr.id(), memtype.id(), buf),
        });

        ensure!(e >= 0, "error reading {}", self.what());
        Ok(())
    }

    /// Read all points converted to `memtype` as elements of `T`. Each point takes up
    /// `memtype.size() / size_of::<T>()` elements.
    ///
    /// `T` must be valid for any bit pattern HDF5 writes for `memtype`.
    pub(crate) fn read_as<T: Copy>(&self, memtype: &Datatype) -> Result<Vec<T>, anyhow::Error> {
        let tsz = mem::size_of::<T>();
        let msz = memtype.size();
        ensure!(
            tsz > 0 && msz % tsz == 0,
            "memory type of {} bytes does not fit elements of {} bytes",
            msz,
            tsz
        );

        let n = self.size()? * (msz / tsz);
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut buf: Vec<T> = Vec::with_capacity(n);

        unsafe {
            self.read_into(memtype, buf.as_mut_ptr() as *mut c_void)?;
            buf.set_len(n);
        }

        Ok(buf)
    }
}
