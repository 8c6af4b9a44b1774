//! Scripted walkthrough: an endless, sectioned feed that pages in while
//! scrolling and loads more data whenever the end is reached, followed by
//! the time and date pickers answered by a canned native module.

mod host;

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Context;
use chrono::NaiveDate;
use futures::executor::block_on;
use host::HeadlessHost;
use listview_platform_android::pickers::{ImmediateModule, ACTION_KEY, DATE_SET_ACTION, TIME_SET_ACTION};
use listview_platform_android::{
    DatePicker, DatePickerMode, DatePickerOptions, NativeMap, TimePicker, TimePickerOptions,
};
use listview_ui::{
    DataSource, HighlightRow, ItemId, ListDataSource, ListViewProps, NativeProps, NativeValue,
    Section,
};

const ROWS_PER_DAY: usize = 12;
const DAYS_PER_PAGE: usize = 3;
const VIEWPORT: f32 = 640.0;

type Feed = DataSource<String, String>;

fn feed_sections(days: usize) -> Vec<Section<String, String>> {
    (0..days)
        .map(|day| {
            (0..ROWS_PER_DAY).fold(
                Section::new(format!("day-{day}")).header(format!("Day {}", day + 1)),
                |section, row| section.row(row, format!("Post {day}.{row}")),
            )
        })
        .collect()
}

fn last_rendered_post(host: &HeadlessHost<Feed, String>) -> String {
    let list = host.list();
    let Some(last) = list.render_state().rendered_rows.checked_sub(1) else {
        return "none".to_string();
    };
    let feed = list.data_source();
    match (feed.section_id_for_flat_index(last), feed.row_id_for_flat_index(last)) {
        (Some(day), Some(post)) => format!("{day}/{post}"),
        _ => "none".to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();

    let empty: Feed = DataSource::new(|a: &String, b: &String| a != b)
        .with_section_header_has_changed(|a: &String, b: &String| a != b);
    let mut days = DAYS_PER_PAGE;
    let feed = empty.clone_with_rows_and_sections(feed_sections(days));

    let load_more = Rc::new(Cell::new(false));
    let end_reached = Rc::clone(&load_more);
    let props = ListViewProps::builder(feed.clone())
        .initial_list_size(8)
        .page_size(4)
        .scroll_render_ahead_distance(600.0)
        .on_end_reached_threshold(300.0)
        .render_header(|| "Feed".to_string())
        .render_section_header(|header: Option<&String>, id: &ItemId| {
            header.cloned().unwrap_or_else(|| id.to_string())
        })
        .render_row(|post: &String, _: &ItemId, _: &ItemId, _: &HighlightRow| post.clone())
        .render_separator(|_: &ItemId, _: &ItemId, adjacent| {
            if adjacent { "==".to_string() } else { "--".to_string() }
        })
        .on_end_reached(move |geometry| {
            log::info!("end reached at {geometry:?}");
            end_reached.set(true);
        })
        .on_change_visible_rows(|visible, _| {
            let count: usize = visible.values().map(|rows| rows.len()).sum();
            log::debug!("{count} rows on screen");
        })
        .build()
        .context("invalid list props")?;

    log::info!(
        "feed has {} children across days {:?}",
        feed.row_and_section_count(),
        feed.section_lengths()
    );
    let mut host = HeadlessHost::mount(props, VIEWPORT);
    let passes = host.settle();
    log::info!("mounted in {passes} passes: {:?}", host.list().get_metrics());

    let mut feed = feed;
    for step in 0..12 {
        host.scroll_to_end();
        host.settle();
        if load_more.replace(false) {
            days += DAYS_PER_PAGE;
            feed = feed.clone_with_rows_and_sections(feed_sections(days));
            let update = host.list_mut().set_data_source(feed.clone());
            log::info!("step {step}: loaded {} more days, {update:?}", DAYS_PER_PAGE);
            host.settle();
        }
        log::info!("step {step}: {:?}", host.list().get_metrics());
        log::info!("step {step}: last rendered post {}", last_rendered_post(&host));
    }

    host.list().highlight_handle().highlight("day-0", 2usize);
    host.settle();
    log::info!("render state: {:?}", host.list().render_state());

    host.list_mut().scroll_to(0.0, 0.0);
    let mut native = NativeProps::new();
    native.insert("scrollEnabled".to_string(), NativeValue::from(true));
    host.list_mut().set_native_props(native);
    log::info!("inner view node: {:?}", host.list().get_inner_view_node());
    host.list_mut().unmount();

    let time = TimePicker::new(ImmediateModule::new(|request: NativeMap| {
        log::info!("native time dialog opened with {request:?}");
        Ok(NativeMap::new()
            .with(ACTION_KEY, TIME_SET_ACTION)
            .with("hour", 18i32)
            .with("minute", 45i32))
    }));
    let picked = block_on(time.open(TimePickerOptions::new().hour(9).minute(30).is_24_hour(true)))?;
    log::info!("time picker: {picked:?}");

    let date = DatePicker::new(ImmediateModule::new(|request: NativeMap| {
        log::info!("native date dialog opened with {request:?}");
        Ok(NativeMap::new()
            .with(ACTION_KEY, DATE_SET_ACTION)
            .with("year", 2024i32)
            .with("month", 5i32)
            .with("day", 14i32))
    }));
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).context("invalid date")?;
    let picked = block_on(
        date.open(
            DatePickerOptions::new()
                .date(today)
                .min_date(today - chrono::Days::new(30))
                .mode(DatePickerMode::Calendar),
        ),
    )?;
    log::info!("date picker: {picked:?} -> {:?}", picked.date());

    Ok(())
}
