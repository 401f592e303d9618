use super::{
    bsdfs::{BrdfTable, Bsdf, Measured},
    Material,
};
use crate::{interaction::SurfaceInteraction, memory::Arena};

use std::sync::Arc;

/// Surface driven by gonioreflectometer data.
pub struct MeasuredMaterial {
    table: Arc<BrdfTable>,
}

impl MeasuredMaterial {
    pub fn new(table: Arc<BrdfTable>) -> Self {
        Self { table }
    }
}

impl Material for MeasuredMaterial {
    fn compute_scattering_functions<'a>(
        &'a self,
        scratch: &'a Arena,
        si: &SurfaceInteraction,
    ) -> Bsdf<'a> {
        let mut bsdf = Bsdf::new(si);
        bsdf.add(scratch.alloc(Measured::new(&self.table)));
        bsdf
    }
}
