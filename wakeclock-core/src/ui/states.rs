//! State handlers and the state table
//!
//! Menu ring (clockwise forward, counter-clockwise backward):
//!
//! ```text
//! TIME -> SCHD -> NAP/STOP -> LOCK -> BRIT -> BACK -> TIME
//! ```
//!
//! Edit flows seed an [`EditSession`] from the menu select handler, mutate
//! it on rotation, and commit on the final select. A select-hold anywhere
//! in an edit flow cancels it without writing.

use super::context::{level_to_percent, percent_to_level, Board, EditField, EditSession, UiContext};
use super::render::{
    field_label, LABEL_BACK, LABEL_BRIGHTNESS, LABEL_DISPLAY, LABEL_LED, LABEL_LOCK, LABEL_NAP,
    LABEL_SCHEDULE, LABEL_START, LABEL_STOP, LABEL_TIME, LABEL_UNLOCK,
};
use super::{StateDescriptor, StateId};
use crate::config::NAP_DEFAULT_MINUTES;
use crate::schedule::{Schedule, ScheduleBlock, TimeOfDay};

/// Handler that only requests a transition
macro_rules! goto_handler {
    ($name:ident, $target:expr) => {
        fn $name<B: Board>(_ctx: &mut UiContext<B>) -> Option<StateId> {
            Some($target)
        }
    };
}

/// Clockwise/counter-clockwise pair adjusting one edit field
macro_rules! edit_handlers {
    ($cw:ident, $ccw:ident, $field:expr) => {
        fn $cw<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
            adjust(ctx, $field, true)
        }

        fn $ccw<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
            adjust(ctx, $field, false)
        }
    };
}

goto_handler!(to_clock, StateId::Clock);
goto_handler!(to_menu_time, StateId::MenuTime);
goto_handler!(to_menu_schedule, StateId::MenuSchedule);
goto_handler!(to_menu_nap, StateId::MenuNap);
goto_handler!(to_menu_lock, StateId::MenuLock);
goto_handler!(to_menu_brightness, StateId::MenuBrightness);
goto_handler!(to_menu_back, StateId::MenuBack);
goto_handler!(to_time_minutes, StateId::TimeSetMinutes);
goto_handler!(to_sleep_minutes, StateId::ScheduleSetSleepMinutes);
goto_handler!(to_quiet_hours, StateId::ScheduleSetQuietHours);
goto_handler!(to_quiet_minutes, StateId::ScheduleSetQuietMinutes);
goto_handler!(to_color_brightness, StateId::SetColorBrightness);

edit_handlers!(hour_cw, hour_ccw, EditField::Hour);
edit_handlers!(minute_cw, minute_ccw, EditField::Minute);
edit_handlers!(sleep_hour_cw, sleep_hour_ccw, EditField::SleepHour);
edit_handlers!(sleep_minute_cw, sleep_minute_ccw, EditField::SleepMinute);
edit_handlers!(quiet_hour_cw, quiet_hour_ccw, EditField::QuietHour);
edit_handlers!(quiet_minute_cw, quiet_minute_ccw, EditField::QuietMinute);
edit_handlers!(nap_cw, nap_ccw, EditField::NapDuration);
edit_handlers!(display_level_cw, display_level_ccw, EditField::DisplayLevel);
edit_handlers!(led_percent_cw, led_percent_ccw, EditField::LedPercent);

// ---------------------------------------------------------------------------
// Clock and Locked
// ---------------------------------------------------------------------------

fn clock_enter<B: Board>(ctx: &mut UiContext<B>) {
    ctx.edit = None;
    ctx.show_time();
}

fn clock_exit<B: Board>(ctx: &mut UiContext<B>) {
    ctx.colon(false);
    ctx.clear_display();
}

fn clock_time_change<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    ctx.show_time();
    None
}

/// Rotation or select on the clock face opens the menu unless locked
fn clock_input<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    if ctx.store.is_locked() {
        lock_notice(ctx);
        None
    } else {
        Some(StateId::MenuTime)
    }
}

fn clock_select_hold<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    if ctx.store.is_locked() {
        unlock(ctx)
    } else {
        None
    }
}

fn locked_input<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    lock_notice(ctx);
    None
}

fn lock_notice<B: Board>(ctx: &mut UiContext<B>) {
    ctx.colon(false);
    ctx.show_message(LABEL_LOCK);
    ctx.show_time();
}

fn unlock<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    if let Err(e) = ctx.store.set_locked(false) {
        warn!("Failed to persist unlock: {}", e);
    }
    ctx.colon(false);
    ctx.show_message(LABEL_UNLOCK);
    Some(StateId::Clock)
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

fn menu_time_enter<B: Board>(ctx: &mut UiContext<B>) {
    ctx.print(LABEL_TIME);
}

fn menu_schedule_enter<B: Board>(ctx: &mut UiContext<B>) {
    ctx.print(LABEL_SCHEDULE);
}

fn menu_nap_enter<B: Board>(ctx: &mut UiContext<B>) {
    let label = if ctx.store.is_nap_enabled() {
        LABEL_STOP
    } else {
        LABEL_NAP
    };
    ctx.print(label);
}

fn menu_lock_enter<B: Board>(ctx: &mut UiContext<B>) {
    ctx.print(LABEL_LOCK);
}

fn menu_brightness_enter<B: Board>(ctx: &mut UiContext<B>) {
    ctx.print(LABEL_BRIGHTNESS);
}

fn menu_back_enter<B: Board>(ctx: &mut UiContext<B>) {
    ctx.print(LABEL_BACK);
}

fn menu_time_select<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    let now = ctx.clock.now();
    ctx.edit = Some(EditSession::Time {
        hour: now.hour,
        minute: now.minute,
    });
    Some(StateId::TimeSetHours)
}

fn menu_schedule_select<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    let today = ctx.clock.now().day();
    let schedule = ctx.store.load_schedule(today);
    ctx.edit = Some(EditSession::Schedule {
        sleep_hour: schedule.sleep_start.hour(),
        sleep_minute: schedule.sleep_start.minute(),
        quiet_hour: schedule.quiet_start.hour(),
        quiet_minute: schedule.quiet_start.minute(),
    });
    Some(StateId::ScheduleSetSleepHours)
}

/// Stops a running nap, otherwise starts editing a new one
fn menu_nap_select<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    if ctx.store.is_nap_enabled() {
        if let Err(e) = ctx.store.stop_nap() {
            warn!("Failed to stop nap: {}", e);
        }
        ctx.refresh_indicator();
        return Some(StateId::Clock);
    }

    ctx.edit = Some(EditSession::Nap {
        duration: NAP_DEFAULT_MINUTES,
    });
    Some(StateId::NapSetDuration)
}

fn menu_lock_select<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    if let Err(e) = ctx.store.set_locked(true) {
        warn!("Failed to persist lock: {}", e);
    }
    Some(StateId::Locked)
}

fn menu_brightness_select<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    let display = ctx.store.display_brightness();
    let led_percent = level_to_percent(ctx.store.led_brightness());
    ctx.edit = Some(EditSession::Brightness {
        display,
        led_percent,
    });
    Some(StateId::SetDisplayBrightness)
}

// ---------------------------------------------------------------------------
// Edit flows
// ---------------------------------------------------------------------------

fn render_field<B: Board>(ctx: &mut UiContext<B>, field: EditField) {
    if let Some(value) = ctx.edit.and_then(|edit| edit.value(field)) {
        ctx.print(&field_label(field, value));
    }
}

/// Brightness edits take effect on the hardware immediately
fn apply_preview<B: Board>(ctx: &mut UiContext<B>, field: EditField) {
    let Some(value) = ctx.edit.and_then(|edit| edit.value(field)) else {
        return;
    };
    match field {
        EditField::DisplayLevel => ctx.set_display_brightness(value as u8),
        EditField::LedPercent => {
            ctx.set_indicator_brightness(percent_to_level(value as u8));
            ctx.show_status(ScheduleBlock::Wake);
        }
        _ => {}
    }
}

fn adjust<B: Board>(ctx: &mut UiContext<B>, field: EditField, forward: bool) -> Option<StateId> {
    if let Some(edit) = ctx.edit.as_mut() {
        edit.step(field, forward);
    }
    apply_preview(ctx, field);
    render_field(ctx, field);
    None
}

/// Select-hold inside an edit flow: drop the session, restore brightness
fn cancel_edit<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    if let Some(EditSession::Brightness { .. }) = ctx.edit.take() {
        let display = ctx.store.display_brightness();
        let led = ctx.store.led_brightness();
        ctx.set_display_brightness(display);
        ctx.set_indicator_brightness(led);
        ctx.refresh_indicator();
    }
    debug!("Edit cancelled");
    Some(StateId::Clock)
}

fn time_hours_enter<B: Board>(ctx: &mut UiContext<B>) {
    render_field(ctx, EditField::Hour);
}

fn time_minutes_enter<B: Board>(ctx: &mut UiContext<B>) {
    render_field(ctx, EditField::Minute);
}

fn commit_time<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    if let Some(EditSession::Time { hour, minute }) = ctx.edit.take() {
        match ctx.clock.set_time(hour, minute, 0) {
            Ok(()) => {
                ctx.refresh_indicator();
            }
            Err(e) => warn!("Failed to set time: {}", e),
        }
    }
    Some(StateId::Clock)
}

fn sleep_hours_enter<B: Board>(ctx: &mut UiContext<B>) {
    ctx.show_message(LABEL_START);
    render_field(ctx, EditField::SleepHour);
}

fn sleep_minutes_enter<B: Board>(ctx: &mut UiContext<B>) {
    render_field(ctx, EditField::SleepMinute);
}

fn quiet_hours_enter<B: Board>(ctx: &mut UiContext<B>) {
    ctx.show_message(LABEL_STOP);
    render_field(ctx, EditField::QuietHour);
}

fn quiet_minutes_enter<B: Board>(ctx: &mut UiContext<B>) {
    render_field(ctx, EditField::QuietMinute);
}

/// Derive the full schedule and apply it to every day
fn commit_schedule<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    if let Some(EditSession::Schedule {
        sleep_hour,
        sleep_minute,
        quiet_hour,
        quiet_minute,
    }) = ctx.edit.take()
    {
        let schedule = Schedule::from_sleep_and_quiet(
            TimeOfDay::from_hm(sleep_hour, sleep_minute),
            TimeOfDay::from_hm(quiet_hour, quiet_minute),
        );
        match ctx.store.save_all_schedules(&schedule) {
            Ok(()) => info!("Schedule saved: {}", schedule),
            Err(e) => warn!("Failed to save schedule: {}", e),
        }
        ctx.refresh_indicator();
    }
    Some(StateId::Clock)
}

fn nap_duration_enter<B: Board>(ctx: &mut UiContext<B>) {
    render_field(ctx, EditField::NapDuration);
}

fn commit_nap<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    if let Some(EditSession::Nap { duration }) = ctx.edit.take() {
        let now = ctx.clock.now();
        if let Err(e) = ctx.store.start_nap(duration, now.time_of_day()) {
            warn!("Failed to start nap: {}", e);
        }
        ctx.refresh_indicator_at(now);
    }
    Some(StateId::Clock)
}

fn display_brightness_enter<B: Board>(ctx: &mut UiContext<B>) {
    ctx.show_message(LABEL_DISPLAY);
    render_field(ctx, EditField::DisplayLevel);
}

fn color_brightness_enter<B: Board>(ctx: &mut UiContext<B>) {
    ctx.show_message(LABEL_LED);
    apply_preview(ctx, EditField::LedPercent);
    render_field(ctx, EditField::LedPercent);
}

fn commit_brightness<B: Board>(ctx: &mut UiContext<B>) -> Option<StateId> {
    if let Some(EditSession::Brightness {
        display,
        led_percent,
    }) = ctx.edit.take()
    {
        let level = percent_to_level(led_percent);
        if let Err(e) = ctx.store.set_display_brightness(display) {
            warn!("Failed to save display brightness: {}", e);
        }
        if let Err(e) = ctx.store.set_led_brightness(level) {
            warn!("Failed to save indicator brightness: {}", e);
        }
        ctx.set_display_brightness(display);
        ctx.set_indicator_brightness(level);
    }
    ctx.refresh_indicator();
    Some(StateId::Clock)
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

fn describe<B: Board>(id: StateId) -> StateDescriptor<UiContext<B>> {
    match id {
        StateId::Clock => StateDescriptor::new(id, "Clock")
            .enter(clock_enter::<B>)
            .exit(clock_exit::<B>)
            .clockwise(clock_input::<B>)
            .counter_clockwise(clock_input::<B>)
            .select(clock_input::<B>)
            .select_hold(clock_select_hold::<B>)
            .time_change(clock_time_change::<B>),
        StateId::Locked => StateDescriptor::new(id, "Locked")
            .enter(clock_enter::<B>)
            .exit(clock_exit::<B>)
            .clockwise(locked_input::<B>)
            .counter_clockwise(locked_input::<B>)
            .select(locked_input::<B>)
            .select_hold(unlock::<B>)
            .time_change(clock_time_change::<B>),
        StateId::MenuTime => StateDescriptor::new(id, "MenuTime")
            .enter(menu_time_enter::<B>)
            .clockwise(to_menu_schedule::<B>)
            .counter_clockwise(to_menu_back::<B>)
            .select(menu_time_select::<B>)
            .select_hold(to_clock::<B>),
        StateId::MenuSchedule => StateDescriptor::new(id, "MenuSchedule")
            .enter(menu_schedule_enter::<B>)
            .clockwise(to_menu_nap::<B>)
            .counter_clockwise(to_menu_time::<B>)
            .select(menu_schedule_select::<B>)
            .select_hold(to_clock::<B>),
        StateId::MenuNap => StateDescriptor::new(id, "MenuNap")
            .enter(menu_nap_enter::<B>)
            .clockwise(to_menu_lock::<B>)
            .counter_clockwise(to_menu_schedule::<B>)
            .select(menu_nap_select::<B>)
            .select_hold(to_clock::<B>),
        StateId::MenuLock => StateDescriptor::new(id, "MenuLock")
            .enter(menu_lock_enter::<B>)
            .clockwise(to_menu_brightness::<B>)
            .counter_clockwise(to_menu_nap::<B>)
            .select(menu_lock_select::<B>)
            .select_hold(to_clock::<B>),
        StateId::MenuBrightness => StateDescriptor::new(id, "MenuBrightness")
            .enter(menu_brightness_enter::<B>)
            .clockwise(to_menu_back::<B>)
            .counter_clockwise(to_menu_lock::<B>)
            .select(menu_brightness_select::<B>)
            .select_hold(to_clock::<B>),
        StateId::MenuBack => StateDescriptor::new(id, "MenuBack")
            .enter(menu_back_enter::<B>)
            .clockwise(to_menu_time::<B>)
            .counter_clockwise(to_menu_brightness::<B>)
            .select(to_clock::<B>)
            .select_hold(to_clock::<B>),
        StateId::TimeSetHours => StateDescriptor::new(id, "TimeSetHours")
            .enter(time_hours_enter::<B>)
            .clockwise(hour_cw::<B>)
            .counter_clockwise(hour_ccw::<B>)
            .select(to_time_minutes::<B>)
            .select_hold(cancel_edit::<B>),
        StateId::TimeSetMinutes => StateDescriptor::new(id, "TimeSetMinutes")
            .enter(time_minutes_enter::<B>)
            .clockwise(minute_cw::<B>)
            .counter_clockwise(minute_ccw::<B>)
            .select(commit_time::<B>)
            .select_hold(cancel_edit::<B>),
        StateId::ScheduleSetSleepHours => StateDescriptor::new(id, "ScheduleSetSleepHours")
            .enter(sleep_hours_enter::<B>)
            .clockwise(sleep_hour_cw::<B>)
            .counter_clockwise(sleep_hour_ccw::<B>)
            .select(to_sleep_minutes::<B>)
            .select_hold(cancel_edit::<B>),
        StateId::ScheduleSetSleepMinutes => StateDescriptor::new(id, "ScheduleSetSleepMinutes")
            .enter(sleep_minutes_enter::<B>)
            .clockwise(sleep_minute_cw::<B>)
            .counter_clockwise(sleep_minute_ccw::<B>)
            .select(to_quiet_hours::<B>)
            .select_hold(cancel_edit::<B>),
        StateId::ScheduleSetQuietHours => StateDescriptor::new(id, "ScheduleSetQuietHours")
            .enter(quiet_hours_enter::<B>)
            .clockwise(quiet_hour_cw::<B>)
            .counter_clockwise(quiet_hour_ccw::<B>)
            .select(to_quiet_minutes::<B>)
            .select_hold(cancel_edit::<B>),
        StateId::ScheduleSetQuietMinutes => StateDescriptor::new(id, "ScheduleSetQuietMinutes")
            .enter(quiet_minutes_enter::<B>)
            .clockwise(quiet_minute_cw::<B>)
            .counter_clockwise(quiet_minute_ccw::<B>)
            .select(commit_schedule::<B>)
            .select_hold(cancel_edit::<B>),
        StateId::NapSetDuration => StateDescriptor::new(id, "NapSetDuration")
            .enter(nap_duration_enter::<B>)
            .clockwise(nap_cw::<B>)
            .counter_clockwise(nap_ccw::<B>)
            .select(commit_nap::<B>)
            .select_hold(cancel_edit::<B>),
        StateId::SetDisplayBrightness => StateDescriptor::new(id, "SetDisplayBrightness")
            .enter(display_brightness_enter::<B>)
            .clockwise(display_level_cw::<B>)
            .counter_clockwise(display_level_ccw::<B>)
            .select(to_color_brightness::<B>)
            .select_hold(cancel_edit::<B>),
        StateId::SetColorBrightness => StateDescriptor::new(id, "SetColorBrightness")
            .enter(color_brightness_enter::<B>)
            .clockwise(led_percent_cw::<B>)
            .counter_clockwise(led_percent_ccw::<B>)
            .select(commit_brightness::<B>)
            .select_hold(cancel_edit::<B>),
    }
}

/// Build the full state table for a board
pub fn build_state_table<B: Board>() -> [StateDescriptor<UiContext<B>>; StateId::COUNT] {
    StateId::ALL.map(describe::<B>)
}
