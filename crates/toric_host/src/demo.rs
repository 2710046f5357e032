//! Single seeded trial with every stage logged.
//!
//! Useful for checking by eye that the decoder pairs defects sensibly and that
//! the correction chains clear the syndrome.

use anyhow::Result;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use toric_core::decoder::MwpmDecoder;
use toric_core::geometry::manhattan_toroidal_distance;
use toric_core::lattice::ToricLattice;

pub fn run_demo(size: usize, p: f64, seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut lattice = ToricLattice::new(size)?;

    lattice.step(p, &mut rng)?;
    info!("L={} p={} seed={}", size, p, seed);
    info!("Flipped qubits: {:?}", lattice.flipped_qubits());
    info!("Syndrome: {:?}", lattice.syndrome_positions());

    let mut decoder = MwpmDecoder::default();
    let pairs = decoder.decode(lattice.stabs(), size)?;
    for &(a, b) in &pairs {
        info!(
            "Match {:?} <-> {:?} (distance {})",
            a,
            b,
            manhattan_toroidal_distance(a, b, size)
        );
    }

    lattice.apply_matching(&pairs);
    lattice.recompute_syndrome();
    info!("Residual errors: {:?}", lattice.flipped_qubits());
    info!("Syndrome cleared: {}", lattice.is_syndrome_clear());
    info!("Logical error: {}", lattice.check_logical_error());
    Ok(())
}
