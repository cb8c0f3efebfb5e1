use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::AnalysisResult;
use crate::stats::{MadeAttempted, PeriodLabel, PeriodTable, TeamPeriodStats};

const TEAM_NAMES: &[&str] = &[
    "Splash Bros",
    "Glass Cleaners",
    "Fast Break Fam",
    "Posterizers",
    "Zone Defense",
    "Bench Mob",
    "Pick and Roll",
    "Triple Threat",
    "Hack-a-Team",
    "Buzzer Beaters",
    "Sixth Men",
    "Full Court Press",
];

/// A plausible weekly table for `teams` teams. Same seed, same table.
pub fn fake_week(teams: usize, week: u32, seed: u64) -> AnalysisResult<PeriodTable> {
    let mut rng = StdRng::seed_from_u64(seed ^ u64::from(week).wrapping_mul(0x9E37_79B9));
    let rows = (0..teams)
        .map(|idx| fake_team(&mut rng, idx))
        .collect::<Vec<_>>();
    PeriodTable::new(PeriodLabel::Week(week), rows)
}

fn fake_team(rng: &mut impl Rng, idx: usize) -> TeamPeriodStats {
    let gp = rng.gen_range(20..=36u32);
    let g = gp as f64;

    let fga = (g * rng.gen_range(7.0..9.5)).round();
    let fgm = (fga * rng.gen_range(0.42..0.51)).round();
    let fta = (g * rng.gen_range(1.8..3.2)).round();
    let ftm = (fta * rng.gen_range(0.70..0.86)).round();
    let tpm = (g * rng.gen_range(0.9..1.8)).round();
    let fg = MadeAttempted::new(fgm, fga);
    let ft = MadeAttempted::new(ftm, fta);

    let name = match TEAM_NAMES.get(idx) {
        Some(base) => base.to_string(),
        None => format!("Team {}", idx + 1),
    };

    TeamPeriodStats {
        team_id: (idx + 1).to_string(),
        name,
        games_played: gp,
        fg,
        ft,
        fgp: fg.pct(),
        ftp: ft.pct(),
        tpm,
        pts: 2.0 * fgm + tpm + ftm,
        reb: (g * rng.gen_range(3.5..5.5)).round(),
        ast: (g * rng.gen_range(2.0..3.2)).round(),
        st: (g * rng.gen_range(0.6..1.1)).round(),
        blk: (g * rng.gen_range(0.3..0.8)).round(),
        to: (g * rng.gen_range(1.1..1.8)).round(),
    }
}
