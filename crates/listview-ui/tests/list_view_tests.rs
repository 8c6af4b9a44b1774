use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use listview_testing::{ListViewTestRule, RecordingScrollSurface, ScrollToCall, UniformLayout};
use listview_ui::{
    ChangedRows, DataSource, EntryKind, HighlightRow, IncrementalRender, ItemId, ListViewProps,
    ListViewPropsBuilder, NativeProps, NativeValue, NodeHandle, RowKey, SchedulingTick, Section,
};

fn numbers(count: u32) -> DataSource<u32> {
    DataSource::new(|a: &u32, b: &u32| a != b).clone_with_rows(0..count)
}

fn builder(data_source: DataSource<u32>) -> ListViewPropsBuilder<DataSource<u32>, String> {
    ListViewProps::builder(data_source)
        .render_row(|row: &u32, _: &ItemId, _: &ItemId, _: &HighlightRow| format!("row {row}"))
}

fn list_rule(builder: ListViewPropsBuilder<DataSource<u32>, String>) -> ListViewTestRule<DataSource<u32>, String> {
    ListViewTestRule::new(builder.build().expect("valid props"))
}

#[test]
fn renders_initial_list_size_on_first_frame() {
    let mut rule = list_rule(builder(numbers(100)).initial_list_size(10).page_size(5));

    assert!(rule.frame());
    assert_eq!(rule.rendered_row_count(), 10);
    let pass = rule.last_pass().expect("render pass");
    assert_eq!(pass.total_rows, 100);
    assert!(pass.rows().all(|entry| entry.should_update));
    assert_eq!(pass.entry("r_s1_3").map(|e| e.content.as_str()), Some("row 3"));
}

#[test]
fn incremental_requests_coalesce_until_next_tick() {
    let mut rule = list_rule(builder(numbers(100)).initial_list_size(10).page_size(5));
    rule.frame();

    let list = rule.list_mut();
    assert_eq!(
        list.request_incremental_render(),
        IncrementalRender::Grew { from: 10, to: 15 }
    );
    assert_eq!(list.request_incremental_render(), IncrementalRender::Coalesced);
    assert_eq!(list.request_incremental_render(), IncrementalRender::Coalesced);
    assert_eq!(list.render_state().rendered_rows, 15);

    rule.frame();
    assert_eq!(rule.rendered_row_count(), 15);
    assert!(rule.list_mut().request_incremental_render().grew());
    assert_eq!(rule.list().render_state().rendered_rows, 20);
}

#[test]
fn growth_follows_the_scroll_position() {
    let mut rule = list_rule(builder(numbers(100)).initial_list_size(10).page_size(5))
        .with_uniform_layout(UniformLayout::new(500.0, 50.0));

    rule.await_idle();
    // Content grows until more than the render-ahead distance is left below
    // the viewport: 35 rows * 50px - 500px = 1250px.
    assert_eq!(rule.rendered_row_count(), 35);
    assert_eq!(rule.content_length(), 1750.0);

    rule.scroll_to_end();
    rule.await_idle();
    assert!(rule.rendered_row_count() > 35);

    for _ in 0..20 {
        rule.scroll_to_end();
        rule.await_idle();
    }
    assert_eq!(rule.rendered_row_count(), 100);
    assert!(rule.list().scheduler().is_fully_rendered());
}

#[test]
fn zero_initial_list_size_pages_rows_in() {
    let mut rule = list_rule(builder(numbers(50)).initial_list_size(0).page_size(5))
        .with_uniform_layout(UniformLayout::new(500.0, 50.0));

    assert!(rule.frame());
    assert_eq!(rule.rendered_row_count(), 0);
    assert_eq!(rule.content_length(), 0.0);

    rule.await_idle();
    assert_eq!(rule.rendered_row_count(), 35);
}

#[test]
fn empty_data_source_grows_once_rows_arrive() {
    let empty = numbers(0);
    let mut rule = list_rule(builder(empty.clone()).initial_list_size(0).page_size(5))
        .with_uniform_layout(UniformLayout::new(500.0, 50.0));
    rule.await_idle();
    assert_eq!(rule.rendered_row_count(), 0);

    let update = rule.set_data_source(empty.clone_with_rows(0..20));
    assert_eq!(update.rendered_rows, 0);
    rule.await_idle();
    assert_eq!(rule.rendered_row_count(), 20);
    assert!(rule.list().scheduler().is_fully_rendered());
}

#[test]
fn shrinking_data_source_clamps_rendered_rows() {
    let first = numbers(100);
    let mut rule = list_rule(builder(first.clone()).initial_list_size(10).page_size(5));
    rule.frame();
    rule.list_mut().request_incremental_render();
    rule.frame();
    rule.list_mut().request_incremental_render();
    rule.frame();
    assert_eq!(rule.rendered_row_count(), 20);

    let update = rule.set_data_source(first.clone_with_rows(0..5));
    assert_eq!(update.rendered_rows, 5);
    assert!(update.clamped());

    assert!(rule.frame());
    assert_eq!(rule.rendered_row_count(), 5);
    assert_eq!(rule.list().get_metrics().total_rows, 5);
}

#[test]
fn only_changed_rows_are_marked_for_update() {
    let first = numbers(3);
    let mut rule = list_rule(builder(first.clone()));
    rule.frame();

    rule.set_data_source(first.clone_with_rows(vec![0, 9, 2]));
    assert!(rule.frame());
    let pass = rule.last_pass().expect("render pass");
    let flags: Vec<bool> = pass.rows().map(|entry| entry.should_update).collect();
    assert_eq!(flags, vec![false, true, false]);
    assert_eq!(pass.entry("r_s1_1").map(|e| e.content.as_str()), Some("row 9"));
}

#[test]
fn same_snapshot_does_not_rerender() {
    let first = numbers(3);
    let mut rule = list_rule(builder(first.clone()));
    rule.await_idle();

    let update = rule.set_data_source(first);
    assert!(!update.version_changed);
    assert!(!rule.frame());
}

#[test]
fn sections_headers_and_separators_are_ordered() {
    let ds: DataSource<&'static str, &'static str> = DataSource::new(|a: &&str, b: &&str| a != b);
    let ds = ds.clone_with_rows_and_sections(vec![
        Section::new("a").header("Alpha").row("a1", "one").row("a2", "two"),
        Section::new("c").header("Gamma").row("c1", "three"),
        Section::new("b").header("Beta"),
    ]);

    let props = ListViewProps::builder(ds)
        .render_row(|row: &&str, _: &ItemId, _: &ItemId, _: &HighlightRow| row.to_string())
        .render_section_header(|header: Option<&&str>, id: &ItemId| {
            format!("{} ({id})", header.copied().unwrap_or("?"))
        })
        .render_separator(|section: &ItemId, row: &ItemId, _| format!("-- {section}/{row}"))
        .render_header(|| "header".to_string())
        .render_footer(|| "footer".to_string())
        .sticky_header_indices([0])
        .build()
        .expect("valid props");
    let mut rule = ListViewTestRule::new(props);
    rule.frame();

    assert_eq!(
        rule.rendered_keys(),
        vec![
            "header", "s_a", "r_a_a1", "sep_a_a1", "r_a_a2", "s_c", "r_c_c1", "sep_c_c1",
            "footer",
        ]
    );
    let pass = rule.last_pass().expect("render pass");
    assert_eq!(pass.sticky_header_indices, vec![0, 1, 5]);
    assert_eq!(pass.entry("s_c").map(|e| e.content.as_str()), Some("Gamma (c)"));
    assert_eq!(pass.entries[3].kind, EntryKind::Separator);
    assert_eq!(
        rule.surface()
            .last_config()
            .map(|config| config.sticky_header_indices.clone()),
        Some(vec![0, 1, 5])
    );
}

#[test]
fn separators_next_to_the_highlighted_row_are_flagged() {
    let props = builder(numbers(4))
        .render_separator(|_: &ItemId, row: &ItemId, adjacent| format!("{row}:{adjacent}"))
        .build()
        .expect("valid props");
    let mut rule = ListViewTestRule::new(props);
    rule.await_idle();

    let highlight = rule.list().highlight_handle();
    highlight.highlight("s1", 1usize);
    assert!(rule.frame());

    let pass = rule.last_pass().expect("render pass");
    let separators: Vec<&str> = pass
        .entries
        .iter()
        .filter(|entry| entry.kind == EntryKind::Separator)
        .map(|entry| entry.content.as_str())
        .collect();
    assert_eq!(separators, vec!["0:true", "1:true", "2:false", "3:false"]);
    assert_eq!(
        rule.list().render_state().highlighted_row,
        Some(RowKey::new("s1", 1usize))
    );

    highlight.clear();
    assert!(rule.frame());
    assert!(!rule.frame());
}

#[test]
fn highlight_set_during_a_pass_applies_to_the_next_one() {
    let props = ListViewProps::builder(numbers(3))
        .render_row(|row: &u32, section: &ItemId, id: &ItemId, highlight: &HighlightRow| {
            if *row == 0 {
                highlight.highlight(section.clone(), id.clone());
            }
            format!("row {row}")
        })
        .render_separator(|_: &ItemId, row: &ItemId, adjacent| format!("{row}:{adjacent}"))
        .build()
        .expect("valid props");
    let mut rule = ListViewTestRule::new(props);

    rule.frame();
    let first = rule.last_pass().expect("render pass");
    assert_eq!(first.entry("sep_s1_0").map(|e| e.content.as_str()), Some("0:false"));

    assert!(rule.frame());
    let second = rule.last_pass().expect("render pass");
    assert_eq!(second.entry("sep_s1_0").map(|e| e.content.as_str()), Some("0:true"));
}

#[test]
fn visibility_changes_are_reported_as_deltas() {
    let changes: Rc<RefCell<Vec<ChangedRows>>> = Rc::default();
    let sink = Rc::clone(&changes);
    let mut rule = list_rule(
        builder(numbers(20))
            .initial_list_size(20)
            .on_change_visible_rows(move |_, changed| sink.borrow_mut().push(changed.clone())),
    )
    .with_uniform_layout(UniformLayout::new(200.0, 50.0));

    rule.await_idle();
    {
        let changes = changes.borrow();
        assert_eq!(changes.len(), 1);
        let section = &changes[0][&ItemId::from("s1")];
        let visible: Vec<i64> = section.keys().filter_map(ItemId::as_int).collect();
        assert_eq!(visible, vec![0, 1, 2, 3]);
        assert!(section.values().all(|visible| *visible));
    }
    assert_eq!(rule.list().get_metrics().visible_row_count, 4);

    rule.scroll_to_offset(100.0);
    rule.await_idle();
    let changes = changes.borrow();
    assert_eq!(changes.len(), 2);
    let section = &changes[1][&ItemId::from("s1")];
    assert_eq!(section.len(), 4);
    assert_eq!(section.get(&ItemId::from(0usize)), Some(&false));
    assert_eq!(section.get(&ItemId::from(1usize)), Some(&false));
    assert_eq!(section.get(&ItemId::from(4usize)), Some(&true));
    assert_eq!(section.get(&ItemId::from(5usize)), Some(&true));
}

#[test]
fn shrinking_data_source_drops_rows_from_the_visible_set() {
    let changes: Rc<RefCell<Vec<ChangedRows>>> = Rc::default();
    let sink = Rc::clone(&changes);
    let first = numbers(20);
    let mut rule = list_rule(
        builder(first.clone())
            .initial_list_size(20)
            .on_change_visible_rows(move |_, changed| sink.borrow_mut().push(changed.clone())),
    )
    .with_uniform_layout(UniformLayout::new(500.0, 50.0));
    rule.await_idle();
    assert_eq!(rule.list().get_metrics().visible_row_count, 10);

    rule.set_data_source(first.clone_with_rows(0..3));
    assert!(rule.frame());

    let metrics = rule.list().get_metrics();
    assert_eq!(rule.rendered_row_count(), 3);
    assert_eq!(metrics.rendered_rows, 3);
    assert_eq!(metrics.visible_row_count, 3);
    let visible: Vec<i64> = rule.list().visible_rows()[&ItemId::from("s1")]
        .keys()
        .filter_map(ItemId::as_int)
        .collect();
    assert_eq!(visible, vec![0, 1, 2]);

    let changes = changes.borrow();
    let left = &changes.last().expect("visibility delta")[&ItemId::from("s1")];
    assert_eq!(left.len(), 7);
    assert!(left.values().all(|visible| !*visible));
    assert_eq!(left.get(&ItemId::from(9usize)), Some(&false));
}

#[test]
fn end_reached_fires_once_per_crossing() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let mut rule = list_rule(
        builder(numbers(12))
            .initial_list_size(10)
            .page_size(5)
            .on_end_reached_threshold(50.0)
            .on_end_reached(move |_| counter.set(counter.get() + 1)),
    )
    .with_uniform_layout(UniformLayout::new(500.0, 50.0));

    rule.await_idle();
    assert_eq!(rule.rendered_row_count(), 12);
    assert_eq!(calls.get(), 0);

    rule.scroll_to_end();
    rule.await_idle();
    assert_eq!(calls.get(), 1);

    rule.scroll_to_offset(90.0);
    rule.await_idle();
    assert_eq!(calls.get(), 1);

    rule.scroll_to_offset(0.0);
    rule.await_idle();
    rule.scroll_to_end();
    rule.await_idle();
    assert_eq!(calls.get(), 2);
}

#[test]
fn end_reached_waits_for_every_row() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let mut rule = list_rule(
        builder(numbers(20))
            .initial_list_size(5)
            .page_size(5)
            .scroll_render_ahead_distance(0.0)
            .on_end_reached_threshold(1000.0)
            .on_end_reached(move |_| counter.set(counter.get() + 1)),
    )
    .with_uniform_layout(UniformLayout::new(100.0, 50.0));

    rule.await_idle();
    assert_eq!(rule.rendered_row_count(), 5);
    assert_eq!(calls.get(), 0);

    rule.scroll_to_end();
    rule.await_idle();
    assert_eq!(rule.rendered_row_count(), 10);
    assert_eq!(calls.get(), 0);
}

#[test]
fn end_reached_fires_again_after_rows_are_appended() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let first = numbers(4);
    let mut rule = list_rule(
        builder(first.clone())
            .on_end_reached_threshold(10.0)
            .on_end_reached(move |_| counter.set(counter.get() + 1)),
    )
    .with_uniform_layout(UniformLayout::new(200.0, 50.0));

    rule.await_idle();
    assert_eq!(calls.get(), 1);

    rule.set_data_source(first.clone_with_rows(0..6));
    rule.await_idle();
    assert_eq!(rule.rendered_row_count(), 6);
    rule.scroll_to_end();
    rule.await_idle();
    assert_eq!(calls.get(), 2);
}

#[test]
fn interval_tick_delays_the_next_growth_pass() {
    let mut rule = list_rule(
        builder(numbers(100))
            .initial_list_size(10)
            .page_size(5)
            .scheduling_tick(SchedulingTick::Interval(Duration::from_millis(100))),
    );
    rule.frame();

    assert!(rule.list_mut().request_incremental_render().grew());
    rule.frame();
    assert_eq!(
        rule.list_mut().request_incremental_render(),
        IncrementalRender::Coalesced
    );

    rule.clock_mut().advance(Duration::from_millis(100));
    rule.frame();
    assert!(rule.list_mut().request_incremental_render().grew());
    assert_eq!(rule.list().render_state().rendered_rows, 20);
}

#[test]
fn unmount_cancels_pending_work_and_ignores_events() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let mut rule = list_rule(
        builder(numbers(12))
            .on_end_reached_threshold(1000.0)
            .on_end_reached(move |_| counter.set(counter.get() + 1)),
    )
    .with_uniform_layout(UniformLayout::new(500.0, 50.0));
    rule.frame();
    rule.list_mut().request_incremental_render();
    assert!(rule.list().has_pending_work());

    rule.list_mut().unmount();
    assert!(!rule.list().is_mounted());
    assert!(!rule.list().has_pending_work());

    let rendered = rule.list().render_state().rendered_rows;
    rule.scroll_to_end();
    assert!(!rule.frame());
    rule.await_idle();
    assert_eq!(rule.list().render_state().rendered_rows, rendered);
    assert_eq!(
        rule.list_mut().request_incremental_render(),
        IncrementalRender::NotNeeded
    );
    assert_eq!(calls.get(), 0);
}

#[test]
fn imperative_calls_reach_the_surface() {
    let props = builder(numbers(3)).horizontal(true).build().expect("valid props");
    let surface = RecordingScrollSurface::new().with_inner_node(NodeHandle(7));
    let mut rule = ListViewTestRule::with_surface(props, surface);

    rule.list_mut().scroll_to(120.0, 5.0);
    let mut props = NativeProps::new();
    props.insert("scrollEnabled".into(), NativeValue::from(false));
    rule.list_mut().set_native_props(props.clone());

    let surface = rule.surface();
    assert_eq!(
        surface.scroll_calls(),
        &[ScrollToCall {
            x: 5.0,
            y: 120.0,
            animated: true
        }]
    );
    assert_eq!(surface.native_props, vec![props]);
    assert_eq!(rule.list().get_inner_view_node(), Some(NodeHandle(7)));

    let config = surface.last_config().expect("config applied on mount");
    assert!(config.horizontal);
    assert!(config.remove_clipped_subviews);
    assert_eq!(config.scroll_event_throttle, Duration::from_millis(50));
}

#[test]
fn metrics_snapshot_the_list() {
    let mut rule = list_rule(builder(numbers(8)).initial_list_size(8))
        .with_uniform_layout(UniformLayout::new(100.0, 50.0));
    rule.await_idle();

    let metrics = rule.list().get_metrics();
    assert_eq!(metrics.content_length, 400.0);
    assert_eq!(metrics.total_rows, 8);
    assert_eq!(metrics.rendered_rows, 8);
    assert_eq!(metrics.visible_row_count, 2);
}
