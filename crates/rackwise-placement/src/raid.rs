//! RAID capacity calculation.
//!
//! Degenerate arrays (too few disks for the level, odd disk counts for
//! RAID10) and unknown levels are counted as plain concatenation. The
//! calculation never fails.

use rackwise_core::Quantity;
use rackwise_state::RaidLevel;

/// Effective capacity of one RAID group.
///
/// `disks` holds `(per-disk size, quantity)` pairs. Quantities are counted,
/// never expanded, so any quantity a snapshot can carry is handled.
pub fn raid_capacity(disks: &[(Quantity, u32)], level: &RaidLevel) -> Quantity {
    let members = disks.iter().filter(|&&(_, quantity)| quantity > 0);

    let mut count: u64 = 0;
    let mut sum = Quantity::ZERO;
    let mut smallest: Option<Quantity> = None;
    for &(size, quantity) in members {
        count += u64::from(quantity);
        sum += size.times(quantity);
        smallest = Some(smallest.map_or(size, |s| s.min(size)));
    }

    let Some(smallest) = smallest else {
        return Quantity::ZERO;
    };

    match level {
        RaidLevel::Raid0 => sum,
        RaidLevel::Raid1 => smallest,
        RaidLevel::Raid5 if count >= 3 => times_count(smallest, count - 1),
        RaidLevel::Raid6 if count >= 4 => times_count(smallest, count - 2),
        RaidLevel::Raid10 if count >= 4 && count % 2 == 0 => sum.halve(),
        _ => sum,
    }
}

/// `size × count` for disk counts beyond `u32`.
fn times_count(size: Quantity, count: u64) -> Quantity {
    match u32::try_from(count) {
        Ok(count) => size.times(count),
        Err(_) => size.scale(count as f64),
    }
}
