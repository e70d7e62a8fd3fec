//! Application loop
//!
//! [`WakeClock`] owns the state machine and its context. The firmware
//! calls [`WakeClock::poll`] once per main loop iteration with the tick
//! flag and the decoded input action.

use crate::clock::{Clock, TickFlag};
use crate::store::ScheduleStore;
use crate::traits::{DisplayDriver, IndicatorDriver};
use crate::ui::{build_state_table, Action, Board, StateId, StateMachine, UiContext};

pub struct WakeClock<B: Board> {
    fsm: StateMachine<UiContext<B>>,
    ctx: UiContext<B>,
}

impl<B: Board> WakeClock<B> {
    /// Bring up the store, apply persisted settings and enter the first
    /// state (Locked when the lock flag is set, otherwise Clock)
    pub fn new(
        mut display: B::Display,
        mut indicator: B::Indicator,
        rtc: B::Rtc,
        storage: B::Storage,
        delay: B::Delay,
    ) -> Self {
        let mut store = ScheduleStore::new(storage);
        if let Err(e) = store.init() {
            error!("Schedule store init failed: {}", e);
        }

        let settings = store.settings();
        info!("Settings: {}", settings);
        if let Err(e) = display.set_brightness(settings.display_brightness) {
            warn!("Display brightness write failed: {}", e);
        }
        if let Err(e) = indicator.set_brightness(settings.led_brightness) {
            warn!("Indicator brightness write failed: {}", e);
        }

        let clock = Clock::new(rtc);
        let mut ctx = UiContext::new(display, indicator, clock, store, delay);
        let mut fsm = StateMachine::new(build_state_table::<B>());

        let initial = if settings.locked {
            StateId::Locked
        } else {
            StateId::Clock
        };
        ctx.refresh_indicator();
        fsm.start(initial, &mut ctx);

        Self { fsm, ctx }
    }

    /// One main loop iteration
    ///
    /// A minute change is dispatched as [`Action::TimeChange`] and then
    /// refreshes the indicator; the input action is dispatched after.
    pub fn poll(&mut self, tick: &TickFlag, action: Action) {
        if let Some(now) = self.ctx.clock.poll(tick) {
            self.fsm.process_action(Action::TimeChange, &mut self.ctx);
            self.ctx.refresh_indicator_at(now);
        }

        if action != Action::None {
            debug!("Action: {}", action);
            self.fsm.process_action(action, &mut self.ctx);
        }
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.fsm.current_state()
    }

    pub fn context(&self) -> &UiContext<B> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut UiContext<B> {
        &mut self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::WallTime;
    use crate::indicator::{BLUE, GREEN, OFF, RED, YELLOW};
    use crate::mock::{MemoryStorage, MockBoard, MockDisplay, MockIndicator, MockRtc, NoDelay};
    use crate::schedule::{DayOfWeek, Schedule, TimeOfDay};
    use wakeclock_hal::{FlashStorage, StorageKey};

    fn app_with(storage: MemoryStorage, time: WallTime) -> WakeClock<MockBoard> {
        WakeClock::new(
            MockDisplay::new(),
            MockIndicator::new(),
            MockRtc::at(time),
            storage,
            NoDelay::default(),
        )
    }

    fn app_at(time: WallTime) -> WakeClock<MockBoard> {
        app_with(MemoryStorage::new(), time)
    }

    fn press(app: &mut WakeClock<MockBoard>, actions: &[Action]) {
        let tick = TickFlag::new();
        for &action in actions {
            app.poll(&tick, action);
        }
    }

    fn shown(app: &WakeClock<MockBoard>) -> &str {
        app.context().display.text.as_str()
    }

    fn locked_storage() -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        storage.write_bool(StorageKey::DeviceLocked, true).unwrap();
        storage
    }

    #[test]
    fn test_boot_shows_time_and_status() {
        let app = app_at(WallTime::new(20, 30, 0, 1));

        assert_eq!(app.current_state(), Some(StateId::Clock));
        assert_eq!(shown(&app), " 830");
        assert!(app.context().display.colon);
        assert_eq!(app.context().display.brightness, Some(3));
        assert_eq!(app.context().indicator.brightness, Some(128));
        assert_eq!(app.context().indicator.color, Some(RED));
    }

    #[test]
    fn test_boot_locked() {
        let app = app_with(locked_storage(), WallTime::new(9, 5, 0, 1));
        assert_eq!(app.current_state(), Some(StateId::Locked));
        assert_eq!(shown(&app), " 905");
    }

    #[test]
    fn test_minute_change_updates_display_and_indicator() {
        let mut app = app_at(WallTime::new(19, 44, 59, 1));
        assert_eq!(app.context().indicator.color, Some(OFF));

        let tick = TickFlag::new();
        app.context_mut().clock.rtc_mut().time = WallTime::new(19, 45, 0, 1);
        tick.raise();
        app.poll(&tick, Action::None);

        assert_eq!(shown(&app), " 745");
        assert_eq!(app.context().indicator.color, Some(BLUE));
    }

    #[test]
    fn test_sub_minute_tick_does_nothing() {
        let mut app = app_at(WallTime::new(7, 20, 10, 1));
        let refreshes = app.context().indicator.writes;

        let tick = TickFlag::new();
        app.context_mut().clock.rtc_mut().time = WallTime::new(7, 20, 11, 1);
        tick.raise();
        app.poll(&tick, Action::None);

        assert_eq!(app.context().indicator.writes, refreshes);
        assert_eq!(app.context().indicator.color, Some(YELLOW));
    }

    #[test]
    fn test_menu_ring_wraps_both_ways() {
        let mut app = app_at(WallTime::new(12, 0, 0, 1));
        press(&mut app, &[Action::Clockwise]);
        assert_eq!(app.current_state(), Some(StateId::MenuTime));
        assert_eq!(shown(&app), "TIME");

        press(&mut app, &[Action::CounterClockwise]);
        assert_eq!(app.current_state(), Some(StateId::MenuBack));
        assert_eq!(shown(&app), "BACK");

        press(
            &mut app,
            &[
                Action::Clockwise,
                Action::Clockwise,
                Action::Clockwise,
                Action::Clockwise,
                Action::Clockwise,
            ],
        );
        assert_eq!(app.current_state(), Some(StateId::MenuBrightness));
        assert_eq!(shown(&app), "BRIT");

        press(&mut app, &[Action::Clockwise, Action::Select]);
        assert_eq!(app.current_state(), Some(StateId::Clock));
    }

    #[test]
    fn test_locked_clock_rejects_input() {
        let mut app = app_at(WallTime::new(10, 0, 0, 1));
        app.context_mut().store.set_locked(true).unwrap();

        press(&mut app, &[Action::Clockwise]);

        assert_eq!(app.current_state(), Some(StateId::Clock));
        assert!(app.context().display.history.iter().any(|t| t == "LOCK"));
        assert_eq!(shown(&app), "1000");
        assert!(app.context_mut().store.is_locked());
    }

    #[test]
    fn test_hold_unlocks_and_persists() {
        let mut app = app_with(locked_storage(), WallTime::new(10, 0, 0, 1));
        press(&mut app, &[Action::Select, Action::CounterClockwise]);
        assert_eq!(app.current_state(), Some(StateId::Locked));

        press(&mut app, &[Action::SelectHold]);
        assert_eq!(app.current_state(), Some(StateId::Clock));
        assert!(app.context().display.history.iter().any(|t| t == "UNLK"));
        assert_eq!(
            app.context_mut()
                .store
                .storage_mut()
                .read_bool(StorageKey::DeviceLocked),
            Ok(false)
        );
    }

    #[test]
    fn test_lock_from_menu() {
        let mut app = app_at(WallTime::new(10, 0, 0, 1));
        press(
            &mut app,
            &[
                Action::Clockwise,
                Action::Clockwise,
                Action::Clockwise,
                Action::Clockwise,
            ],
        );
        assert_eq!(shown(&app), "LOCK");
        press(&mut app, &[Action::Select]);

        assert_eq!(app.current_state(), Some(StateId::Locked));
        assert!(app.context_mut().store.is_locked());
        press(&mut app, &[Action::Clockwise]);
        assert_eq!(app.current_state(), Some(StateId::Locked));
    }

    #[test]
    fn test_hold_on_unlocked_clock_is_ignored() {
        let mut app = app_at(WallTime::new(10, 0, 0, 1));
        let writes = app.context_mut().store.storage_mut().writes;
        press(&mut app, &[Action::SelectHold]);
        assert_eq!(app.current_state(), Some(StateId::Clock));
        assert_eq!(app.context_mut().store.storage_mut().writes, writes);
    }

    #[test]
    fn test_set_time_commits_once() {
        let mut app = app_at(WallTime::new(6, 58, 0, 1));
        press(&mut app, &[Action::Select, Action::Select]);
        assert_eq!(app.current_state(), Some(StateId::TimeSetHours));
        assert_eq!(shown(&app), "06AM");

        press(&mut app, &[Action::Clockwise, Action::CounterClockwise, Action::Clockwise]);
        assert_eq!(shown(&app), "07AM");

        press(&mut app, &[Action::Select]);
        assert_eq!(app.current_state(), Some(StateId::TimeSetMinutes));
        assert_eq!(shown(&app), "M 58");

        press(&mut app, &[Action::Clockwise, Action::Clockwise]);
        assert_eq!(shown(&app), "M 00");
        assert!(app.context_mut().clock.rtc_mut().set_calls.is_empty());

        press(&mut app, &[Action::Select]);
        assert_eq!(app.current_state(), Some(StateId::Clock));
        assert_eq!(app.context_mut().clock.rtc_mut().set_calls, vec![(7, 0, 0)]);
        assert_eq!(shown(&app), " 700");
        assert!(app.context().edit.is_none());
    }

    #[test]
    fn test_cancel_time_edit_writes_nothing() {
        let mut app = app_at(WallTime::new(6, 58, 0, 1));
        press(
            &mut app,
            &[Action::Select, Action::Select, Action::Clockwise, Action::SelectHold],
        );
        assert_eq!(app.current_state(), Some(StateId::Clock));
        assert!(app.context_mut().clock.rtc_mut().set_calls.is_empty());
        assert!(app.context().edit.is_none());
    }

    #[test]
    fn test_schedule_edit_saves_every_day() {
        let mut app = app_at(WallTime::new(12, 0, 0, 3));
        press(&mut app, &[Action::Clockwise, Action::Clockwise, Action::Select]);
        assert_eq!(app.current_state(), Some(StateId::ScheduleSetSleepHours));
        assert!(app.context().display.history.iter().any(|t| t == "STRT"));
        assert_eq!(shown(&app), "08PM");

        // Sleep 21:30
        press(&mut app, &[Action::Clockwise, Action::Select]);
        for _ in 0..30 {
            press(&mut app, &[Action::Clockwise]);
        }
        assert_eq!(shown(&app), "M 30");
        press(&mut app, &[Action::Select]);

        // Quiet 06:00
        assert_eq!(app.current_state(), Some(StateId::ScheduleSetQuietHours));
        assert!(app.context().display.history.iter().any(|t| t == "STOP"));
        press(&mut app, &[Action::CounterClockwise, Action::Select]);
        for _ in 0..15 {
            press(&mut app, &[Action::CounterClockwise]);
        }
        press(&mut app, &[Action::Select]);

        assert_eq!(app.current_state(), Some(StateId::Clock));
        let expected =
            Schedule::from_sleep_and_quiet(TimeOfDay::from_hm(21, 30), TimeOfDay::from_hm(6, 0));
        let week = app.context_mut().store.load_weekly();
        assert!(week.iter().all(|(_, s)| *s == expected));
        assert_eq!(expected.winddown_start, TimeOfDay::from_hm(21, 0));
    }

    #[test]
    fn test_nap_start_and_stop_from_menu() {
        let mut app = app_at(WallTime::new(14, 0, 0, 2));
        press(&mut app, &[Action::Clockwise, Action::Clockwise, Action::Clockwise]);
        assert_eq!(app.current_state(), Some(StateId::MenuNap));
        assert_eq!(shown(&app), "NAP");

        press(&mut app, &[Action::Select]);
        assert_eq!(shown(&app), "  60");
        for _ in 0..6 {
            press(&mut app, &[Action::CounterClockwise]);
        }
        assert_eq!(shown(&app), "  30");
        press(&mut app, &[Action::Select]);

        assert_eq!(app.current_state(), Some(StateId::Clock));
        assert!(app.context_mut().store.is_nap_enabled());
        assert_eq!(
            app.context_mut().store.load_nap(),
            Schedule::nap(30, TimeOfDay::from_hm(14, 0))
        );
        assert_eq!(app.context().indicator.color, Some(RED));

        // Menu now offers to stop it
        press(&mut app, &[Action::Clockwise, Action::Clockwise, Action::Clockwise]);
        assert_eq!(shown(&app), "STOP");
        press(&mut app, &[Action::Select]);
        assert_eq!(app.current_state(), Some(StateId::Clock));
        assert!(!app.context_mut().store.is_nap_enabled());
        assert_eq!(app.context().indicator.color, Some(OFF));
    }

    #[test]
    fn test_nap_expires_on_tick() {
        let mut app = app_at(WallTime::new(14, 0, 0, 2));
        app.context_mut()
            .store
            .start_nap(30, TimeOfDay::from_hm(14, 0))
            .unwrap();

        let tick = TickFlag::new();
        app.context_mut().clock.rtc_mut().time = WallTime::new(14, 50, 0, 2);
        tick.raise();
        app.poll(&tick, Action::None);
        assert_eq!(app.context().indicator.color, Some(GREEN));

        app.context_mut().clock.rtc_mut().time = WallTime::new(15, 1, 0, 2);
        tick.raise();
        app.poll(&tick, Action::None);
        assert_eq!(app.context().indicator.color, Some(OFF));
        assert!(!app.context_mut().store.is_nap_enabled());
    }

    #[test]
    fn test_brightness_edit_applies_live_and_persists() {
        let mut app = app_at(WallTime::new(12, 0, 0, 1));
        press(
            &mut app,
            &[
                Action::CounterClockwise,
                Action::CounterClockwise,
                Action::CounterClockwise,
                Action::Select,
            ],
        );
        assert_eq!(app.current_state(), Some(StateId::SetDisplayBrightness));
        assert_eq!(shown(&app), "  03");

        press(&mut app, &[Action::Clockwise, Action::Clockwise]);
        assert_eq!(app.context().display.brightness, Some(5));
        press(&mut app, &[Action::Select]);

        assert_eq!(app.current_state(), Some(StateId::SetColorBrightness));
        assert_eq!(shown(&app), " 50%");
        assert_eq!(app.context().indicator.color, Some(GREEN));
        for _ in 0..12 {
            press(&mut app, &[Action::Clockwise]);
        }
        assert_eq!(shown(&app), "100%");
        assert_eq!(app.context().indicator.brightness, Some(255));
        press(&mut app, &[Action::Select]);

        assert_eq!(app.current_state(), Some(StateId::Clock));
        let settings = app.context_mut().store.settings();
        assert_eq!(settings.display_brightness, 5);
        assert_eq!(settings.led_brightness, 255);
        assert_eq!(app.context().indicator.color, Some(OFF));
    }

    #[test]
    fn test_brightness_cancel_restores_levels() {
        let mut app = app_at(WallTime::new(12, 0, 0, 1));
        press(
            &mut app,
            &[
                Action::CounterClockwise,
                Action::CounterClockwise,
                Action::CounterClockwise,
                Action::Select,
                Action::CounterClockwise,
                Action::SelectHold,
            ],
        );
        assert_eq!(app.current_state(), Some(StateId::Clock));
        assert_eq!(app.context().display.brightness, Some(3));
        assert_eq!(app.context_mut().store.display_brightness(), 3);
    }

    #[test]
    fn test_schedule_edit_seeds_from_today() {
        let mut storage = MemoryStorage::new();
        let custom =
            Schedule::from_sleep_and_quiet(TimeOfDay::from_hm(22, 15), TimeOfDay::from_hm(6, 40));
        let record = custom.to_record().unwrap();
        storage
            .write(StorageKey::schedule(DayOfWeek::Friday.index()), &record)
            .unwrap();
        storage.write_bool(StorageKey::Initialized, true).unwrap();

        let mut app = app_with(storage, WallTime::new(12, 0, 0, 5));
        press(&mut app, &[Action::Clockwise, Action::Clockwise, Action::Select]);
        assert_eq!(shown(&app), "10PM");
        press(&mut app, &[Action::Select]);
        assert_eq!(shown(&app), "M 15");
    }
}
