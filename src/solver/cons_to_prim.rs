//! Conservative→primitive driver.
//!
//! Walks every sub-block of a level, optionally prepares the radiation
//! energy and flux-limiter fields, and calls the per-cell transform over
//! the ghost-extended region of each block. Each block writes only its
//! own output boxes, so blocks run concurrently without locks.
//!
//! Three entry points:
//!
//! - [`ConsToPrim::convert_whole_state`]: the canonical ghost-filled state,
//!   `num_grow` ghost cells, freshly allocated outputs
//! - [`ConsToPrim::convert_generic_state`]: caller-supplied containers,
//!   over the output's ghost width
//! - [`ConsToPrim::convert_fourth_order`]: cell averages to fourth-order
//!   primitive averages for SDC

use crate::config::{HydroConfig, PhysicsMode};
use crate::equations::{EquationOfState, KernelContext, conserved_to_primitive};
use crate::error::{HydroError, Result};
use crate::field::{FieldBox, MultiField};
use crate::grid::{IndexBox, Level};
use crate::radiation::{RadiationCell, RadiationCoupling, RadiationFields};
use crate::state::StateLayout;

use super::diagnostics::check_for_nan;
use super::execution::ExecutionStrategy;
use super::fourth_order::{make_cell_center, make_fourth_average};
use super::repair::{enforce_minimum_density, reset_internal_energy};

/// Primitive and auxiliary state derived from a conserved state.
#[derive(Clone, Debug)]
pub struct PrimitiveFields {
    /// Primitive state
    pub q: MultiField,
    /// Auxiliary EOS scalars
    pub qaux: MultiField,
}

/// Outputs of the fourth-order conversion.
///
/// `q` and `qaux` are fourth-order cell averages valid on `num_grow - 1`
/// ghost cells; the bar fields are the primitive state of the cell
/// averages themselves, valid on `num_grow`.
#[derive(Clone, Debug)]
pub struct FourthOrderPrimitive {
    /// Fourth-order averaged primitive state
    pub q: MultiField,
    /// Fourth-order averaged auxiliary state
    pub qaux: MultiField,
    /// Primitive state of the cell averages
    pub q_bar: MultiField,
    /// Auxiliary state of the cell averages
    pub qaux_bar: MultiField,
    /// Cell-centred temperature, kept when thermal diffusion is enabled
    pub t_cc: Option<MultiField>,
}

/// Conservative→primitive driver for one level.
///
/// # Example
///
/// ```
/// use amr_hydro::config::HydroConfig;
/// use amr_hydro::equations::GammaLaw;
/// use amr_hydro::field::MultiField;
/// use amr_hydro::grid::Level;
/// use amr_hydro::solver::ConsToPrim;
/// use amr_hydro::state::StateLayout;
/// use amr_hydro::types::{CellSize, SpaceDim};
///
/// let config = HydroConfig::new().with_num_grow(2);
/// let level = Level::uniform([8, 8, 1], [4, 4, 1], CellSize::uniform(0.1), SpaceDim::Two);
/// let eos = GammaLaw::new(1.4);
///
/// let mut u = MultiField::new(&level, config.layout().n_conserved(), 2);
/// u.fill_with(|_, cell| {
///     cell.fill(0.0);
///     cell[StateLayout::URHO] = 1.0;
///     cell[StateLayout::UEDEN] = 2.5;
///     cell[StateLayout::UEINT] = 2.5;
///     cell[StateLayout::UFS] = 1.0;
/// });
///
/// let driver = ConsToPrim::new(&config, &level, &eos).unwrap();
/// let prim = driver.convert_whole_state(&u, 0.0).unwrap();
/// assert!((prim.q.max_abs_component(StateLayout::QPRES) - 1.0).abs() < 1e-14);
/// ```
pub struct ConsToPrim<'a, E: EquationOfState + ?Sized> {
    config: &'a HydroConfig,
    level: &'a Level,
    eos: &'a E,
    radiation: Option<&'a dyn RadiationCoupling>,
}

impl<'a, E: EquationOfState + ?Sized> ConsToPrim<'a, E> {
    /// Driver for `level` after validating `config`.
    pub fn new(config: &'a HydroConfig, level: &'a Level, eos: &'a E) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            level,
            eos,
            radiation: None,
        })
    }

    /// Attach the radiation collaborator for radiation-coupled physics.
    pub fn with_radiation(mut self, coupling: &'a dyn RadiationCoupling) -> Self {
        self.radiation = Some(coupling);
        self
    }

    /// Component layout in use.
    #[inline]
    pub fn layout(&self) -> StateLayout {
        self.config.layout()
    }

    fn execution(&self) -> ExecutionStrategy {
        self.config.execution
    }

    /// Convert the canonical ghost-filled state `sborder` over every
    /// block grown by `num_grow`.
    pub fn convert_whole_state(&self, sborder: &MultiField, time: f64) -> Result<PrimitiveFields> {
        self.check_conserved(sborder)?;
        let ng = self.config.num_grow;
        if sborder.n_grow() < ng {
            return Err(HydroError::GhostWidth {
                input: sborder.n_grow(),
                output: ng,
            });
        }

        let layout = self.layout();
        let rad = self.radiation_fields(sborder, ng, time)?;
        let mut q = MultiField::new(self.level, layout.n_primitive(), ng);
        let mut qaux = MultiField::new(self.level, layout.n_aux(), ng);
        self.convert_blocks(sborder, rad.as_ref(), &mut q, &mut qaux, ng)?;

        log::debug!(
            "converted {} blocks at t = {} with {} ghost cells ({})",
            self.level.n_blocks(),
            time,
            ng,
            self.execution().name()
        );
        Ok(PrimitiveFields { q, qaux })
    }

    /// Convert `u` into caller-supplied containers over the ghost width
    /// of `q_out`.
    ///
    /// # Errors
    ///
    /// - [`HydroError::ComponentMismatch`] if a container does not match
    ///   the layout
    /// - [`HydroError::GhostWidth`] if `q_out` is wider than `u`
    /// - [`HydroError::AuxGhostWidth`] if `qaux_out` is narrower than `q_out`
    /// - [`HydroError::BlockMismatch`] if the containers are not on the
    ///   level's blocks
    pub fn convert_generic_state(
        &self,
        u: &MultiField,
        q_out: &mut MultiField,
        qaux_out: &mut MultiField,
        time: f64,
    ) -> Result<()> {
        let layout = self.layout();
        self.check_conserved(u)?;
        if q_out.n_comp() != layout.n_primitive() {
            return Err(HydroError::component_mismatch(
                "primitive state",
                layout.n_primitive(),
                q_out.n_comp(),
            ));
        }
        if qaux_out.n_comp() != layout.n_aux() {
            return Err(HydroError::component_mismatch(
                "auxiliary state",
                layout.n_aux(),
                qaux_out.n_comp(),
            ));
        }
        let ng = q_out.n_grow();
        if ng > u.n_grow() {
            return Err(HydroError::GhostWidth {
                input: u.n_grow(),
                output: ng,
            });
        }
        if qaux_out.n_grow() < ng {
            return Err(HydroError::AuxGhostWidth {
                aux: qaux_out.n_grow(),
                primitive: ng,
            });
        }
        if !q_out.same_blocks(u) {
            return Err(HydroError::BlockMismatch("primitive state"));
        }
        if !qaux_out.same_blocks(u) {
            return Err(HydroError::BlockMismatch("auxiliary state"));
        }

        let rad = self.radiation_fields(u, ng, time)?;
        self.convert_blocks(u, rad.as_ref(), q_out, qaux_out, ng)
    }

    /// Convert cell-average conserved state into fourth-order cell
    /// averages of the primitive state.
    ///
    /// Pass 1, per block: deconvolve to cell centres on `num_grow - 1`,
    /// apply the density floor and energy reset, then convert both the
    /// averages (on `num_grow`) and the centres (on `num_grow - 1`).
    /// Pass 2, after every block finished pass 1: add the Laplacian of
    /// the bar fields to the centred fields.
    ///
    /// # Errors
    ///
    /// - [`HydroError::RadiationUnsupported`] for radiation-coupled physics
    /// - [`HydroError::IntegrationModeMismatch`] outside fourth-order SDC
    /// - [`HydroError::NonFinite`] when the audit finds NaN or Inf
    pub fn convert_fourth_order(&self, sborder: &MultiField, time: f64) -> Result<FourthOrderPrimitive> {
        if self.config.physics.is_radiation_coupled() {
            return Err(HydroError::RadiationUnsupported);
        }
        if self.config.integration.sdc_scheme().is_none() {
            return Err(HydroError::IntegrationModeMismatch {
                required: "fourth-order SDC",
            });
        }
        self.check_conserved(sborder)?;
        let ng = self.config.num_grow;
        if sborder.n_grow() < ng {
            return Err(HydroError::GhostWidth {
                input: sborder.n_grow(),
                output: ng,
            });
        }
        let ngm1 = ng - 1;

        let layout = self.layout();
        let dim = self.level.dim;
        let strategy = self.execution();
        let ctx = KernelContext::new(self.eos, layout, self.config.dual_energy_eta1);
        let config = self.config;

        let mut u_cc = MultiField::new(self.level, layout.n_conserved(), ng);
        let mut q = MultiField::new(self.level, layout.n_primitive(), ng);
        let mut qaux = MultiField::new(self.level, layout.n_aux(), ng);
        let mut q_bar = MultiField::new(self.level, layout.n_primitive(), ng);
        let mut qaux_bar = MultiField::new(self.level, layout.n_aux(), ng);

        {
            let mut work: Vec<CellCentreWork<'_>> = u_cc
                .fabs_mut()
                .iter_mut()
                .zip(q.fabs_mut())
                .zip(qaux.fabs_mut())
                .zip(q_bar.fabs_mut())
                .zip(qaux_bar.fabs_mut())
                .map(|((((u_cc, q), qaux), q_bar), qaux_bar)| CellCentreWork {
                    u_cc,
                    q,
                    qaux,
                    q_bar,
                    qaux_bar,
                })
                .collect();

            strategy.for_each_block(&mut work, |b, w| {
                let u_avg = sborder.fab(b);
                let wide = u_avg.valid().grow(ng as i32, dim);
                let narrow = u_avg.valid().grow(ngm1 as i32, dim);

                make_cell_center(u_avg, w.u_cc, &narrow, dim);
                enforce_minimum_density(w.u_cc, &narrow, &layout, config.small_dens, config.verbose);
                reset_internal_energy(
                    w.u_cc,
                    &narrow,
                    &layout,
                    self.eos,
                    config.small_temp,
                    config.dual_energy_eta2,
                );

                convert_block(&ctx, strategy, u_avg, None, w.q_bar, w.qaux_bar, &wide)?;
                convert_block(&ctx, strategy, w.u_cc, None, w.q, w.qaux, &narrow)
            })?;
        }

        if strategy.audits_enabled() {
            check_for_nan(&q, "q", ngm1)?;
            check_for_nan(&q_bar, "q_bar", ng)?;
        }

        let t_cc = if config.diffusion {
            let mut t = MultiField::new(self.level, 1, ngm1);
            t.copy_components(&q, StateLayout::QTEMP, 0, 1, ngm1);
            Some(t)
        } else {
            None
        };

        // Every block's centred values must exist before any averaging
        {
            let mut work: Vec<(&mut FieldBox, &mut FieldBox)> =
                q.fabs_mut().iter_mut().zip(qaux.fabs_mut()).collect();
            strategy.for_each_block(&mut work, |b, (qf, af)| {
                let narrow = sborder.fab(b).valid().grow(ngm1 as i32, dim);
                make_fourth_average(qf, q_bar.fab(b), &narrow, dim);
                make_fourth_average(af, qaux_bar.fab(b), &narrow, dim);
                Ok(())
            })?;
        }

        log::debug!(
            "fourth-order conversion of {} blocks at t = {} ({})",
            self.level.n_blocks(),
            time,
            strategy.name()
        );
        Ok(FourthOrderPrimitive {
            q,
            qaux,
            q_bar,
            qaux_bar,
            t_cc,
        })
    }

    fn check_conserved(&self, u: &MultiField) -> Result<()> {
        let expected = self.layout().n_conserved();
        if u.n_comp() != expected {
            return Err(HydroError::component_mismatch("conserved state", expected, u.n_comp()));
        }
        let on_level = u.n_blocks() == self.level.n_blocks()
            && u
                .fabs()
                .iter()
                .zip(&self.level.blocks)
                .all(|(fab, block)| fab.valid() == *block);
        if !on_level {
            return Err(HydroError::BlockMismatch("conserved state"));
        }
        Ok(())
    }

    fn radiation_fields(&self, u: &MultiField, n_grow: usize, time: f64) -> Result<Option<RadiationFields>> {
        let PhysicsMode::RadiationCoupled { groups } = self.config.physics else {
            return Ok(None);
        };
        let coupling = self.radiation.ok_or(HydroError::MissingRadiation)?;
        if coupling.n_groups() != groups {
            return Err(HydroError::component_mismatch(
                "radiation energy",
                groups,
                coupling.n_groups(),
            ));
        }

        let fields = RadiationFields::prepare(coupling, self.level, u, n_grow, time);
        for (name, field) in [("radiation energy", &fields.energy), ("flux limiter", &fields.limiter)] {
            if field.n_comp() != groups {
                return Err(HydroError::component_mismatch(name, groups, field.n_comp()));
            }
            if field.n_grow() < n_grow {
                return Err(HydroError::GhostWidth {
                    input: field.n_grow(),
                    output: n_grow,
                });
            }
            if !field.same_blocks(u) {
                return Err(HydroError::BlockMismatch(name));
            }
        }
        Ok(Some(fields))
    }

    fn convert_blocks(
        &self,
        u: &MultiField,
        rad: Option<&RadiationFields>,
        q: &mut MultiField,
        qaux: &mut MultiField,
        n_grow: usize,
    ) -> Result<()> {
        let ctx = KernelContext::new(self.eos, self.layout(), self.config.dual_energy_eta1);
        let strategy = self.execution();
        let dim = self.level.dim;

        let mut work: Vec<(&mut FieldBox, &mut FieldBox)> =
            q.fabs_mut().iter_mut().zip(qaux.fabs_mut()).collect();
        strategy.for_each_block(&mut work, |b, (qf, af)| {
            let region = u.fab(b).valid().grow(n_grow as i32, dim);
            let rad_fabs = rad.map(|r| (r.energy.fab(b), r.limiter.fab(b)));
            convert_block(&ctx, strategy, u.fab(b), rad_fabs, qf, af, &region)?;
            log::trace!("block {} converted over {}", b, region);
            Ok(())
        })
    }
}

/// Exclusive per-block outputs of the first fourth-order pass.
struct CellCentreWork<'f> {
    u_cc: &'f mut FieldBox,
    q: &'f mut FieldBox,
    qaux: &'f mut FieldBox,
    q_bar: &'f mut FieldBox,
    qaux_bar: &'f mut FieldBox,
}

/// Run the transform over `region` of one block.
fn convert_block<E: EquationOfState + ?Sized>(
    ctx: &KernelContext<'_, E>,
    strategy: ExecutionStrategy,
    u: &FieldBox,
    rad: Option<(&FieldBox, &FieldBox)>,
    q: &mut FieldBox,
    qaux: &mut FieldBox,
    region: &IndexBox,
) -> Result<()> {
    let layout = ctx.layout;
    let nu = layout.n_conserved();
    let nq = layout.n_primitive();
    let ngroups = layout.n_groups();
    let width = nq + layout.n_aux();

    let scratch_len = nu + 2 * ngroups;
    let values = strategy.map_cells_with(region, width, || vec![0.0; scratch_len], |scratch, iv, lane| {
        let (u_cell, rad_cell) = scratch.split_at_mut(nu);
        u.cell_values(iv, u_cell);

        let rad = match rad {
            Some((energy, limiter)) => {
                let (e_cell, l_cell) = rad_cell.split_at_mut(ngroups);
                energy.cell_values(iv, e_cell);
                limiter.cell_values(iv, l_cell);
                Some(RadiationCell {
                    energy: e_cell,
                    limiter: l_cell,
                })
            }
            None => None,
        };

        let (q_cell, aux_cell) = lane.split_at_mut(nq);
        conserved_to_primitive(ctx, iv, u_cell, rad, q_cell, aux_cell)
    })?;

    for (n, iv) in region.cells().enumerate() {
        let lane = &values[n * width..(n + 1) * width];
        q.set_cell_values(iv, &lane[..nq]);
        qaux.set_cell_values(iv, &lane[nq..]);
    }
    Ok(())
}
