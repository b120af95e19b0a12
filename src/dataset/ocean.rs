//! Ocean dataset: variables plus the parameters and subsampling state that
//! diagnostics depend on.

use super::{Dataset, Parameters};
use crate::compute::Compute;
use crate::error::Result;
use crate::subsample::{Subsample, Subsampling};

/// A [`Dataset`] together with its physical [`Parameters`].
///
/// Diagnostics are reached through [`compute`](Self::compute), subsampling
/// through [`subsample`](Self::subsample).
#[derive(Clone, Debug)]
pub struct OceanDataset {
    /// Free-form name used in logs.
    pub name: String,
    dataset: Dataset,
    parameters: Parameters,
    subsampling: Option<Subsampling>,
}

impl OceanDataset {
    /// Wrap a dataset with default parameters.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            name: String::from("ocean"),
            dataset,
            parameters: Parameters::default(),
            subsampling: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the parameters after validating them.
    pub fn with_parameters(mut self, parameters: Parameters) -> Result<Self> {
        parameters.validate()?;
        self.parameters = parameters;
        Ok(self)
    }

    pub(crate) fn with_subsampling(mut self, subsampling: Subsampling) -> Self {
        self.subsampling = Some(subsampling);
        self
    }

    #[inline]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[inline]
    pub fn dataset_mut(&mut self) -> &mut Dataset {
        &mut self.dataset
    }

    #[inline]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// How the dataset was subsampled, if at all.
    #[inline]
    pub fn subsampling(&self) -> Option<&Subsampling> {
        self.subsampling.as_ref()
    }

    /// Copy of this ocean dataset with the variables of `ds` merged in.
    ///
    /// Variables with the same name are overwritten.
    pub fn merge_into_oceandataset(&self, ds: Dataset) -> Result<OceanDataset> {
        let mut out = self.clone();
        out.dataset.merge(ds)?;
        Ok(out)
    }

    /// Diagnostics that return this dataset with their outputs merged.
    pub fn compute(&self) -> Compute<'_> {
        Compute::new(self)
    }

    /// Subsampling methods.
    pub fn subsample(&self) -> Subsample<'_> {
        Subsample::new(self)
    }
}
