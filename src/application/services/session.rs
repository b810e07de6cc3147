//! Visualizer session: the single state container driven by the shell
//!
//! Holds the tree, its plan, the playback cursor, the play flag and the
//! theme. All changes go through the transition methods, which notify the
//! registered observers afterwards.

use std::io;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument, warn};

use crate::application::services::playback::{Playback, PlaybackState};
use crate::application::ApplicationResult;
use crate::domain::{
    assign_layout_with_step, plan_inorder, NodeId, Position, RandomTreeOptions, Theme,
    TraversalStep, TreeArena, TreeBuilder, DEFAULT_POOL, VERTICAL_STEP,
};

/// Where the session's trees come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSource {
    /// The fixed seven node sample tree
    Sample,
    /// A random tree; a seed makes the whole session reproducible
    Random { seed: Option<u64> },
}

/// Layout and generation parameters of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub origin: Position,
    pub spacing: f64,
    pub vertical_step: f64,
    pub pool: Vec<i64>,
    pub random: RandomTreeOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            origin: Position::new(300.0, 50.0),
            spacing: 140.0,
            vertical_step: VERTICAL_STEP,
            pool: DEFAULT_POOL.to_vec(),
            random: RandomTreeOptions::default(),
        }
    }
}

/// Handle of a scheduled auto-play tick.
///
/// Only the most recently scheduled handle is live; any state change cancels
/// it, after which firing it does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle(u64);

/// What changed in a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Advanced(TraversalStep),
    Completed,
    Reset,
    Regenerated,
    PlayToggled(bool),
    ThemeChanged(Theme),
}

/// Receives every session change after it has been applied.
///
/// An observer that fails is detached, and a running auto-play is paused.
pub trait SessionObserver {
    fn on_event(&mut self, event: &SessionEvent, session: &Session) -> io::Result<()>;
}

/// A node paired with its layout and visited flag, ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: NodeId,
    pub value: i64,
    pub position: Option<Position>,
    pub parent_position: Option<Position>,
    pub visited: bool,
}

pub struct Session {
    tree: TreeArena,
    plan: Arc<[TraversalStep]>,
    playback: Playback,
    is_playing: bool,
    theme: Theme,
    pending_tick: Option<TickHandle>,
    tick_generation: u64,
    builder: TreeBuilder,
    options: SessionOptions,
    rng: StdRng,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl Session {
    /// Creates a session with its first tree, laid out and planned.
    #[instrument(level = "debug", skip(options))]
    pub fn new(options: SessionOptions, source: TreeSource, theme: Theme) -> ApplicationResult<Self> {
        let builder = TreeBuilder::with_options(options.random)?;
        let mut rng = match source {
            TreeSource::Random { seed: Some(seed) } => StdRng::seed_from_u64(seed),
            _ => StdRng::from_entropy(),
        };
        let tree = match source {
            TreeSource::Sample => TreeBuilder::build_sample_tree(),
            TreeSource::Random { .. } => builder.build_random_tree(&options.pool, &mut rng)?,
        };

        let mut session = Self {
            tree: TreeArena::new(),
            plan: Arc::from(Vec::new()),
            playback: Playback::new(),
            is_playing: false,
            theme,
            pending_tick: None,
            tick_generation: 0,
            builder,
            options,
            rng,
            observers: Vec::new(),
        };
        session.install_tree(tree);
        Ok(session)
    }

    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    pub fn tree(&self) -> &TreeArena {
        &self.tree
    }

    pub fn plan(&self) -> &[TraversalStep] {
        &self.plan
    }

    /// Shared handle to the current plan; stays valid across regenerations.
    pub fn plan_handle(&self) -> Arc<[TraversalStep]> {
        Arc::clone(&self.plan)
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn state(&self) -> PlaybackState {
        self.playback.state(&self.plan)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn pending_tick(&self) -> Option<TickHandle> {
        self.pending_tick
    }

    /// Plays one step by hand. Stops auto-play.
    #[instrument(level = "debug", skip(self))]
    pub fn advance(&mut self) -> Option<TraversalStep> {
        self.cancel_pending_tick();
        if self.is_playing {
            self.is_playing = false;
            self.notify(SessionEvent::PlayToggled(false));
        }
        self.step()
    }

    /// Back to the start of the plan. Tree and plan are kept.
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) {
        self.cancel_pending_tick();
        self.is_playing = false;
        self.playback.reset();
        self.notify(SessionEvent::Reset);
    }

    /// Replaces tree and plan with a new random tree.
    #[instrument(level = "debug", skip(self))]
    pub fn regenerate(&mut self) -> ApplicationResult<()> {
        let tree = self
            .builder
            .build_random_tree(&self.options.pool, &mut self.rng)?;
        self.cancel_pending_tick();
        self.is_playing = false;
        self.install_tree(tree);
        info!("regenerated tree with {} nodes", self.tree.node_count());
        self.notify(SessionEvent::Regenerated);
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        debug!("theme: {}", self.theme);
        self.notify(SessionEvent::ThemeChanged(self.theme));
        self.theme
    }

    /// Starts or pauses auto-play. Starting a finished playback restarts it
    /// from the beginning.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_play(&mut self) -> bool {
        self.cancel_pending_tick();
        if self.is_playing {
            self.is_playing = false;
        } else {
            if self.state() == PlaybackState::Complete {
                self.playback.reset();
                self.notify(SessionEvent::Reset);
            }
            self.is_playing = !self.plan.is_empty();
        }
        self.notify(SessionEvent::PlayToggled(self.is_playing));
        self.is_playing
    }

    /// Schedules the next auto-play tick, replacing any pending one.
    /// Returns None when not playing.
    pub fn schedule_tick(&mut self) -> Option<TickHandle> {
        if !self.is_playing {
            return None;
        }
        self.tick_generation += 1;
        let handle = TickHandle(self.tick_generation);
        self.pending_tick = Some(handle);
        Some(handle)
    }

    /// Fires a scheduled tick. Stale handles are ignored.
    pub fn fire_tick(&mut self, handle: TickHandle) -> Option<TraversalStep> {
        if self.pending_tick != Some(handle) {
            debug!("ignoring stale tick {:?}", handle);
            return None;
        }
        self.pending_tick = None;
        self.step()
    }

    /// Pre-order walk pairing every node with its position and visited flag.
    pub fn node_views(&self) -> Vec<NodeView> {
        self.tree
            .iter()
            .map(|(_, node)| NodeView {
                id: node.id().clone(),
                value: node.value(),
                position: node.position,
                parent_position: node
                    .parent
                    .and_then(|p| self.tree.get_node(p))
                    .and_then(|p| p.position),
                visited: self.playback.is_visited(node.id()),
            })
            .collect()
    }

    fn step(&mut self) -> Option<TraversalStep> {
        let step = self.playback.advance(&self.plan).cloned()?;
        self.notify(SessionEvent::Advanced(step.clone()));
        if self.playback.is_complete(&self.plan) {
            self.cancel_pending_tick();
            if self.is_playing {
                self.is_playing = false;
                self.notify(SessionEvent::PlayToggled(false));
            }
            self.notify(SessionEvent::Completed);
        }
        Some(step)
    }

    fn install_tree(&mut self, mut tree: TreeArena) {
        let o = &self.options;
        assign_layout_with_step(&mut tree, o.origin.x, o.origin.y, o.spacing, o.vertical_step);
        self.plan = Arc::from(plan_inorder(&tree));
        self.tree = tree;
        self.playback.reset();
    }

    fn cancel_pending_tick(&mut self) {
        if self.pending_tick.take().is_some() {
            debug!("cancelled pending tick");
        }
    }

    fn notify(&mut self, event: SessionEvent) {
        let mut observers = std::mem::take(&mut self.observers);
        let before = observers.len();
        observers.retain_mut(|observer| match observer.on_event(&event, self) {
            Ok(()) => true,
            Err(e) => {
                warn!("detaching session observer: {}", e);
                false
            }
        });
        let failed = observers.len() < before;
        self.observers = observers;

        if failed && self.is_playing {
            self.cancel_pending_tick();
            self.is_playing = false;
            self.notify(SessionEvent::PlayToggled(false));
        }
    }
}
