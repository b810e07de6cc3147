//! Terminal rendering of a session
//!
//! Draws the tree twice (as a hierarchy and as a 2-D diagram placed by the
//! layout positions), the emitted values as badges, a legend and a status
//! line, colored by theme.

use std::collections::BTreeMap;
use std::io::{self, Write};

use colored::{Color, ColoredString, Colorize};
use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;
use tracing::warn;

use crate::application::services::{NodeView, Playback, Session, SessionEvent, SessionObserver};
use crate::domain::{Theme, TreeArena};

const VISITED_MARK: &str = "●";
const UNVISITED_MARK: &str = "○";
/// Layout units per diagram column.
const UNITS_PER_COLUMN: f64 = 10.0;
/// Larger diagrams are not drawn.
const MAX_COLUMNS: f64 = 400.0;
const MAX_ROWS: f64 = 200.0;

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub visited: Color,
    pub unvisited: Color,
    pub edge: Color,
    pub accent: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                visited: Color::Green,
                unvisited: Color::Blue,
                edge: Color::BrightBlack,
                accent: Color::Magenta,
            },
            Theme::Dark => Self {
                visited: Color::BrightGreen,
                unvisited: Color::BrightWhite,
                edge: Color::White,
                accent: Color::BrightCyan,
            },
        }
    }

    fn node(&self, label: &str, visited: bool) -> ColoredString {
        if visited {
            label.color(self.visited).bold()
        } else {
            label.color(self.unvisited)
        }
    }
}

/// Full frame: status, hierarchy, diagram, badges and legend.
pub fn frame(session: &Session) -> String {
    let palette = Palette::for_theme(session.theme());
    let views = session.node_views();
    [
        status(session),
        hierarchy(session.tree(), session.playback(), &palette).to_string(),
        diagram(&views, session.options().vertical_step, &palette),
        format!("result: {}", badges(session.playback().result(), &palette)),
        legend(&palette),
    ]
    .join("\n")
}

/// `step 3/7 | in progress | light | paused`
pub fn status(session: &Session) -> String {
    let played = session.playback().result().len();
    format!(
        "step {}/{} | {} | {} | {}",
        played,
        session.plan().len(),
        session.state(),
        session.theme(),
        if session.is_playing() { "playing" } else { "paused" }
    )
}

/// Hierarchy view; children are prefixed with their side.
pub fn hierarchy(tree: &TreeArena, playback: &Playback, palette: &Palette) -> Tree<String> {
    fn build(
        tree: &TreeArena,
        idx: Index,
        prefix: &str,
        playback: &Playback,
        palette: &Palette,
    ) -> Option<Tree<String>> {
        let node = tree.get_node(idx)?;
        let visited = playback.is_visited(node.id());
        let mark = if visited { VISITED_MARK } else { UNVISITED_MARK };
        let label = format!("{}{} {}", prefix, node.value(), mark);
        let leaves = [("L: ", node.left), ("R: ", node.right)]
            .into_iter()
            .filter_map(|(prefix, child)| build(tree, child?, prefix, playback, palette))
            .collect::<Vec<_>>();
        Some(Tree::new(palette.node(&label, visited).to_string()).with_leaves(leaves))
    }

    tree.root()
        .and_then(|root| build(tree, root, "", playback, palette))
        .unwrap_or_else(|| Tree::new("(empty tree)".to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Blank,
    Edge(char),
    Node(char, bool),
}

/// Character grid placing each node by its layout position.
///
/// Nodes without a position are skipped, as are edges to them. A layout too
/// wide or too tall for the grid yields an empty diagram.
pub fn diagram(views: &[NodeView], vertical_step: f64, palette: &Palette) -> String {
    let placed: Vec<_> = views
        .iter()
        .filter_map(|view| view.position.map(|p| (view, p)))
        .collect();
    if placed.is_empty() {
        return String::new();
    }

    let (min_x, max_x) = placed
        .iter()
        .map(|(_, p)| p.x)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)));
    let (min_y, max_y) = placed
        .iter()
        .map(|(_, p)| p.y)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));
    // Two grid rows per level: one for nodes, one for edges
    let row_height = vertical_step / 2.0;

    let columns = (max_x - min_x) / UNITS_PER_COLUMN;
    let rows = if row_height > 0.0 {
        (max_y - min_y) / row_height
    } else {
        f64::NAN
    };
    // NaN fails both comparisons
    if !(columns <= MAX_COLUMNS && rows <= MAX_ROWS) {
        warn!(columns, rows, "layout too large for the diagram, skipping it");
        return String::new();
    }
    let to_cell = |x: f64, y: f64| {
        let col = ((x - min_x) / UNITS_PER_COLUMN).round().max(0.0) as usize;
        let row = ((y - min_y) / row_height).round().max(0.0) as usize;
        (row, col)
    };

    let mut grid: BTreeMap<usize, BTreeMap<usize, Cell>> = BTreeMap::new();
    for (view, p) in &placed {
        if let Some(parent) = view.parent_position {
            let (row, col) = to_cell((p.x + parent.x) / 2.0, (p.y + parent.y) / 2.0);
            // Parent outside the drawn nodes
            if row as f64 > MAX_ROWS || col as f64 > MAX_COLUMNS {
                continue;
            }
            let ch = if p.x < parent.x { '/' } else { '\\' };
            grid.entry(row).or_default().insert(col, Cell::Edge(ch));
        }
    }
    for (view, p) in &placed {
        let (row, col) = to_cell(p.x, p.y);
        let line = grid.entry(row).or_default();
        for (offset, ch) in view.value.to_string().chars().enumerate() {
            line.insert(col + offset, Cell::Node(ch, view.visited));
        }
    }

    let last_row = grid.keys().next_back().copied().unwrap_or(0);
    (0..=last_row)
        .map(|row| {
            let Some(line) = grid.get(&row) else {
                return String::new();
            };
            let width = line.keys().next_back().map_or(0, |c| c + 1);
            (0..width)
                .map(|col| match line.get(&col).copied().unwrap_or(Cell::Blank) {
                    Cell::Blank => " ".to_string(),
                    Cell::Edge(ch) => ch.to_string().color(palette.edge).to_string(),
                    Cell::Node(ch, visited) => palette.node(&ch.to_string(), visited).to_string(),
                })
                .collect::<String>()
        })
        .join("\n")
}

/// Emitted values in traversal order, one badge each.
pub fn badges(result: &[i64], palette: &Palette) -> String {
    if result.is_empty() {
        return "(empty)".dimmed().to_string();
    }
    result
        .iter()
        .map(|v| format!("[{}]", v).color(palette.visited).bold().to_string())
        .join(" ")
}

pub fn legend(palette: &Palette) -> String {
    format!(
        "{} visited  {} unvisited",
        VISITED_MARK.color(palette.visited),
        UNVISITED_MARK.color(palette.unvisited)
    )
}

/// Prints a frame whenever the session changes.
pub struct FramePrinter<W: Write> {
    out: W,
}

impl<W: Write> FramePrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> SessionObserver for FramePrinter<W> {
    fn on_event(&mut self, event: &SessionEvent, session: &Session) -> io::Result<()> {
        let text = match event {
            SessionEvent::Advanced(step) => {
                format!("{}\n{}\n", format!("→ {}", step).bold(), frame(session))
            }
            SessionEvent::Reset | SessionEvent::Regenerated | SessionEvent::ThemeChanged(_) => {
                format!("{}\n", frame(session))
            }
            SessionEvent::Completed => {
                let palette = Palette::for_theme(session.theme());
                format!(
                    "{}\n",
                    format!(
                        "traversal complete: {}",
                        session.playback().result().iter().join(" ")
                    )
                    .color(palette.accent)
                )
            }
            SessionEvent::PlayToggled(playing) => {
                format!("{}\n", if *playing { "playing" } else { "paused" }.dimmed())
            }
        };
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}
