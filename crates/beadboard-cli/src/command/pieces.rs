use beadboard_engine::{LocalMask, Puzzle, Rotation, Variant};

use super::PuzzleArg;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PiecesArg {
    #[clap(flatten)]
    puzzle: PuzzleArg,
}

pub(crate) fn run(arg: &PiecesArg) -> anyhow::Result<()> {
    let puzzle = Puzzle::new(arg.puzzle.load()?);
    let config = puzzle.config();

    for (id, piece) in config.inventory().iter() {
        let shape = piece.shape();
        let moves = puzzle.catalog().moves(id.index());
        let skipped = if config.is_skipped(id) {
            ", skipped"
        } else {
            ""
        };
        println!(
            "{} {} (length {}, {} placements{skipped})",
            id.symbol(),
            piece.name(),
            shape.length(),
            moves.len()
        );
        for variant in Variant::ALL {
            println!(
                "  variant {variant}: {} beads",
                shape.variant(variant).count()
            );
            let grids = Rotation::ALL.map(|rotation| {
                let (width, height) = rotation.footprint(shape.length());
                render(shape.oriented(variant, rotation), width, height)
            });
            for line in side_by_side(&grids, shape.length()) {
                println!("    {}", line.trim_end());
            }
        }
        println!();
    }
    Ok(())
}

fn render(mask: LocalMask, width: usize, height: usize) -> Vec<String> {
    mask.to_ascii(width, height)
        .lines()
        .map(str::to_owned)
        .collect()
}

/// Joins the grids column by column, padding shorter ones with blanks.
fn side_by_side(grids: &[Vec<String>], height: usize) -> Vec<String> {
    let widths: Vec<_> = grids
        .iter()
        .map(|grid| grid.iter().map(String::len).max().unwrap_or(0))
        .collect();
    (0..height)
        .map(|row| {
            grids
                .iter()
                .zip(&widths)
                .map(|(grid, width)| {
                    let line = grid.get(row).map_or("", String::as_str);
                    format!("{line:<width$}")
                })
                .collect::<Vec<_>>()
                .join("   ")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_by_side() {
        let grids = [
            vec!["x x".to_owned(), ". x".to_owned()],
            vec!["x".to_owned(), "x".to_owned(), ".".to_owned()],
        ];
        assert_eq!(
            side_by_side(&grids, 3),
            ["x x   x", ". x   x", "      ."]
        );
    }
}
