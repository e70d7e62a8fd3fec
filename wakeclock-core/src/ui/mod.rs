//! Menu and edit state machine
//!
//! A fixed table of state descriptors, one row per [`StateId`], each with
//! optional handler slots:
//!
//! ```text
//! ┌───────────────┬─────────┬────────┬────┬─────┬────────┬──────┬────────────┐
//! │ StateId       │ enter   │ exit   │ cw │ ccw │ select │ hold │ time change│
//! ├───────────────┼─────────┼────────┼────┼─────┼────────┼──────┼────────────┤
//! │ Clock         │ fn(ctx) │ fn(ctx)│ fn │ fn  │ fn     │ fn   │ fn         │
//! │ MenuTime      │ fn(ctx) │ -      │ fn │ fn  │ fn     │ fn   │ -          │
//! │ ...           │         │        │    │     │        │      │            │
//! └───────────────┴─────────┴────────┴────┴─────┴────────┴──────┴────────────┘
//! ```
//!
//! An event handler returns `Some(next)` to request a transition. A
//! transition always runs the current state's exit handler and then the
//! next state's enter handler, even when `next` is the current state, so
//! handlers can re-enter a state to redraw it.

pub mod context;
pub mod render;
pub mod states;

pub use context::{Board, EditField, EditSession, UiContext};
pub use states::build_state_table;

/// Input delivered to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    None,
    Clockwise,
    CounterClockwise,
    Select,
    SelectHold,
    /// The displayed minute changed
    TimeChange,
}

/// Every UI state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StateId {
    Clock = 0,
    Locked = 1,
    MenuTime = 2,
    MenuSchedule = 3,
    MenuNap = 4,
    MenuLock = 5,
    MenuBrightness = 6,
    MenuBack = 7,
    TimeSetHours = 8,
    TimeSetMinutes = 9,
    ScheduleSetSleepHours = 10,
    ScheduleSetSleepMinutes = 11,
    ScheduleSetQuietHours = 12,
    ScheduleSetQuietMinutes = 13,
    NapSetDuration = 14,
    SetDisplayBrightness = 15,
    SetColorBrightness = 16,
}

impl StateId {
    /// Number of states, sizes the table
    pub const COUNT: usize = 17;

    pub const ALL: [StateId; StateId::COUNT] = [
        StateId::Clock,
        StateId::Locked,
        StateId::MenuTime,
        StateId::MenuSchedule,
        StateId::MenuNap,
        StateId::MenuLock,
        StateId::MenuBrightness,
        StateId::MenuBack,
        StateId::TimeSetHours,
        StateId::TimeSetMinutes,
        StateId::ScheduleSetSleepHours,
        StateId::ScheduleSetSleepMinutes,
        StateId::ScheduleSetQuietHours,
        StateId::ScheduleSetQuietMinutes,
        StateId::NapSetDuration,
        StateId::SetDisplayBrightness,
        StateId::SetColorBrightness,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Enter/exit action
pub type StateActionFn<C> = fn(&mut C);

/// Event handler; `Some(next)` requests a transition
pub type StateEventFn<C> = fn(&mut C) -> Option<StateId>;

/// One row of the state table
pub struct StateDescriptor<C> {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn<C>>,
    pub on_exit: Option<StateActionFn<C>>,
    pub on_clockwise: Option<StateEventFn<C>>,
    pub on_counter_clockwise: Option<StateEventFn<C>>,
    pub on_select: Option<StateEventFn<C>>,
    pub on_select_hold: Option<StateEventFn<C>>,
    pub on_time_change: Option<StateEventFn<C>>,
}

impl<C> StateDescriptor<C> {
    /// A state with no handlers
    pub fn new(id: StateId, name: &'static str) -> Self {
        Self {
            id,
            name,
            on_enter: None,
            on_exit: None,
            on_clockwise: None,
            on_counter_clockwise: None,
            on_select: None,
            on_select_hold: None,
            on_time_change: None,
        }
    }

    pub fn enter(mut self, f: StateActionFn<C>) -> Self {
        self.on_enter = Some(f);
        self
    }

    pub fn exit(mut self, f: StateActionFn<C>) -> Self {
        self.on_exit = Some(f);
        self
    }

    pub fn clockwise(mut self, f: StateEventFn<C>) -> Self {
        self.on_clockwise = Some(f);
        self
    }

    pub fn counter_clockwise(mut self, f: StateEventFn<C>) -> Self {
        self.on_counter_clockwise = Some(f);
        self
    }

    pub fn select(mut self, f: StateEventFn<C>) -> Self {
        self.on_select = Some(f);
        self
    }

    pub fn select_hold(mut self, f: StateEventFn<C>) -> Self {
        self.on_select_hold = Some(f);
        self
    }

    pub fn time_change(mut self, f: StateEventFn<C>) -> Self {
        self.on_time_change = Some(f);
        self
    }

    fn handler(&self, action: Action) -> Option<StateEventFn<C>> {
        match action {
            Action::None => None,
            Action::Clockwise => self.on_clockwise,
            Action::CounterClockwise => self.on_counter_clockwise,
            Action::Select => self.on_select,
            Action::SelectHold => self.on_select_hold,
            Action::TimeChange => self.on_time_change,
        }
    }
}

/// The state machine engine
///
/// Owns the table and the current state; the context is threaded through
/// every handler call.
pub struct StateMachine<C> {
    /// Indexed by `StateId as usize`
    table: [StateDescriptor<C>; StateId::COUNT],
    current: Option<StateId>,
}

impl<C> StateMachine<C> {
    /// Build an engine with no active state
    pub fn new(table: [StateDescriptor<C>; StateId::COUNT]) -> Self {
        debug_assert!(table
            .iter()
            .enumerate()
            .all(|(i, row)| row.id.index() == i));
        Self {
            table,
            current: None,
        }
    }

    /// Enter the initial state
    pub fn start(&mut self, initial: StateId, ctx: &mut C) {
        info!("UI starting in {}", self.table[initial.index()].name);
        self.set_state(initial, ctx);
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    /// Exit the current state (if any) and enter `next`
    pub fn set_state(&mut self, next: StateId, ctx: &mut C) {
        if let Some(current) = self.current {
            debug!(
                "UI transition: {} -> {}",
                self.table[current.index()].name,
                self.table[next.index()].name
            );
            if let Some(exit) = self.table[current.index()].on_exit {
                exit(ctx);
            }
        }

        self.current = Some(next);

        if let Some(enter) = self.table[next.index()].on_enter {
            enter(ctx);
        }
    }

    /// Dispatch one action to the current state
    pub fn process_action(&mut self, action: Action, ctx: &mut C) {
        let Some(current) = self.current else {
            return;
        };
        let Some(handler) = self.table[current.index()].handler(action) else {
            return;
        };
        if let Some(next) = handler(ctx) {
            self.set_state(next, ctx);
        }
    }
}
