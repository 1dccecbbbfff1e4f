//! Per-cell conservative→primitive transform.
//!
//! The transform is a pure function of one cell's conserved vector (and,
//! when radiation is coupled, that cell's group energies and limiters).
//! Every execution strategy calls the same function.

use crate::error::{HydroError, Result};
use crate::grid::IntVect;
use crate::radiation::RadiationCell;
use crate::state::StateLayout;

use super::equation_of_state::EquationOfState;

/// Read-only inputs shared by every cell of a conversion.
pub struct KernelContext<'a, E: EquationOfState + ?Sized> {
    /// Equation of state
    pub eos: &'a E,
    /// Component layout of U, Q and aux
    pub layout: StateLayout,
    /// Dual-energy switch η₁
    pub dual_energy_eta1: f64,
}

impl<'a, E: EquationOfState + ?Sized> KernelContext<'a, E> {
    /// Bundle the kernel inputs.
    pub fn new(eos: &'a E, layout: StateLayout, dual_energy_eta1: f64) -> Self {
        Self {
            eos,
            layout,
            dual_energy_eta1,
        }
    }
}

/// Convert one cell's conserved vector `u` into primitive `q` and
/// auxiliary `qaux`.
///
/// Density and specific internal energy must be positive on entry; a
/// value that is provably non-positive is reported as
/// [`HydroError::NonPositiveState`]. Non-finite input is passed through so
/// the primitive-state audit can locate it.
///
/// When the layout carries radiation groups but `rad` is `None`, the
/// radiation inputs are taken as zero.
///
/// # Example
///
/// ```
/// use amr_hydro::equations::{conserved_to_primitive, GammaLaw, KernelContext};
/// use amr_hydro::state::StateLayout;
///
/// let layout = StateLayout::new(1, 0);
/// let eos = GammaLaw::new(1.4);
/// let ctx = KernelContext::new(&eos, layout, 1.0);
///
/// // rho = 1 at rest with rho e = 2.5, so p = 1
/// let u = [1.0, 0.0, 0.0, 0.0, 2.5, 2.5, 0.0, 1.0];
/// let mut q = vec![0.0; layout.n_primitive()];
/// let mut qaux = vec![0.0; layout.n_aux()];
/// conserved_to_primitive(&ctx, [0, 0, 0], &u, None, &mut q, &mut qaux).unwrap();
/// assert!((q[StateLayout::QPRES] - 1.0).abs() < 1e-14);
/// ```
pub fn conserved_to_primitive<E: EquationOfState + ?Sized>(
    ctx: &KernelContext<'_, E>,
    cell: IntVect,
    u: &[f64],
    rad: Option<RadiationCell<'_>>,
    q: &mut [f64],
    qaux: &mut [f64],
) -> Result<()> {
    let layout = ctx.layout;
    debug_assert_eq!(u.len(), layout.n_conserved());
    debug_assert_eq!(q.len(), layout.n_primitive());
    debug_assert_eq!(qaux.len(), layout.n_aux());

    let rho = u[StateLayout::URHO];
    if rho <= 0.0 {
        return Err(HydroError::NonPositiveState {
            quantity: "density",
            value: rho,
            cell,
        });
    }
    let rhoinv = 1.0 / rho;

    let vel = [
        u[StateLayout::UMX] * rhoinv,
        u[StateLayout::UMY] * rhoinv,
        u[StateLayout::UMZ] * rhoinv,
    ];
    q[StateLayout::QRHO] = rho;
    q[StateLayout::QU] = vel[0];
    q[StateLayout::QV] = vel[1];
    q[StateLayout::QW] = vel[2];

    // Dual energy: trust the total energy only when kinetic energy is a
    // small fraction of it
    let kineng = 0.5 * rho * (vel[0] * vel[0] + vel[1] * vel[1] + vel[2] * vel[2]);
    let eden = u[StateLayout::UEDEN];
    let e = if eden - kineng > ctx.dual_energy_eta1 * eden {
        (eden - kineng) * rhoinv
    } else {
        u[StateLayout::UEINT] * rhoinv
    };
    if e <= 0.0 {
        return Err(HydroError::NonPositiveState {
            quantity: "internal energy",
            value: e,
            cell,
        });
    }

    let n_species = layout.n_species();
    for n in 0..n_species {
        q[layout.qfs(n)] = u[layout.ufs(n)] * rhoinv;
    }

    let x = &q[StateLayout::QFS..StateLayout::QFS + n_species];
    let eos = ctx.eos.from_density_energy(rho, e, u[StateLayout::UTEMP], x);

    let rhoe = rho * e;
    q[StateLayout::QREINT] = rhoe;
    q[StateLayout::QTEMP] = eos.temperature;
    q[StateLayout::QPRES] = eos.pressure;
    q[StateLayout::QGAME] = eos.pressure / rhoe + 1.0;

    qaux[StateLayout::QGAMC] = eos.gamma1;
    qaux[StateLayout::QC] = eos.sound_speed;
    qaux[StateLayout::QDPDR] = eos.dpdr_e;
    qaux[StateLayout::QDPDE] = eos.dpde;

    if layout.has_radiation() {
        let mut ptot = eos.pressure;
        let mut reitot = rhoe;
        let mut csrad2 = 0.0;
        for g in 0..layout.n_groups() {
            let (er, lam) = match rad {
                Some(cell) => (cell.energy[g], cell.limiter[g]),
                None => (0.0, 0.0),
            };
            q[layout.qrad(g)] = er;
            qaux[layout.qlams(g)] = lam;

            ptot += lam * er;
            reitot += er;
            // gamr = lambda + 1
            csrad2 += (lam + 1.0) * lam * er * rhoinv;
        }
        q[layout.qptot()] = ptot;
        q[layout.qreitot()] = reitot;

        let cg = (eos.sound_speed * eos.sound_speed + csrad2).sqrt();
        qaux[layout.qcg()] = cg;
        qaux[layout.qgamcg()] = rho * cg * cg / ptot;
    }

    Ok(())
}
