use crate::merge_cmd::merge_files;
use crate::output::{render_message, OutputFormat};
use crate::pane::TextPane;
use agentview_core::tool_card::ToolCardRegistry;
use agentview_core::{AggregatePolicy, Message};
use agentview_runtime_config::ViewerConfig;
use agentview_timeline::window::visible_messages;
use agentview_timeline::{
    AutoScroll, EventBus, LoadCompletion, LoadOlder, TimelineEvent, Viewport, ViewportConfig,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

const PANE_HEIGHT: usize = 40;

#[derive(Debug, Clone)]
pub struct ViewArgs {
    pub files: Vec<PathBuf>,
    pub older: usize,
    pub baseline: Option<usize>,
    pub drop_empty: bool,
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ViewOutput<'a> {
    total: usize,
    shown: usize,
    older_remaining: usize,
    messages: &'a [Message],
}

pub fn run_view(args: &ViewArgs, config: &ViewerConfig) -> Result<()> {
    let policy = AggregatePolicy {
        drop_empty: args.drop_empty || config.aggregation.drop_empty_messages,
    };
    let merged = merge_files(&args.files, &policy)?;
    let shown: Vec<Message> = visible_messages(&merged).into_iter().cloned().collect();
    let total = shown.len();

    let mut viewport_config = ViewportConfig::from(&config.timeline);
    if let Some(baseline) = args.baseline {
        viewport_config.baseline_count = baseline.max(1);
    }
    let viewport = Rc::new(RefCell::new(Viewport::new(viewport_config)));

    let mut bus = EventBus::new();
    let subscriber = Rc::clone(&viewport);
    bus.subscribe(move |event: &TimelineEvent| subscriber.borrow_mut().handle(event));
    bus.subscribe(|event: &TimelineEvent| tracing::debug!(?event, "timeline event"));
    bus.publish(&TimelineEvent::InitialLoadComplete {
        message_count: total,
    });

    let cards = ToolCardRegistry::default();
    let mut pane = TextPane::new(PANE_HEIGHT);
    pane.set_lines(render_lines(viewport.borrow().visible_slice(&shown), &cards));
    let scrolled = viewport.borrow_mut().auto_scroll(&mut pane);
    if scrolled == AutoScroll::Skipped {
        tracing::debug!("initial scroll to latest skipped");
    }

    for _ in 0..args.older {
        let started = viewport.borrow_mut().begin_load_older(total, &pane);
        let ticket = match started {
            LoadOlder::Started(ticket) => ticket,
            LoadOlder::Rejected(rejection) => {
                tracing::debug!(?rejection, "stopped loading older messages");
                break;
            }
        };
        pane.set_lines(render_lines(viewport.borrow().visible_slice(&shown), &cards));
        match viewport.borrow_mut().finish_load_older(ticket, &mut pane) {
            LoadCompletion::Restored { scroll_top } => {
                tracing::debug!(scroll_top, "restored scroll after loading older messages");
            }
            completion @ (LoadCompletion::Skipped | LoadCompletion::Abandoned) => {
                tracing::debug!(?completion, "scroll not restored after loading older messages");
            }
        }
    }

    let viewport = viewport.borrow();
    let window = viewport.visible_slice(&shown);
    let older_remaining = total - window.len();

    match args.format {
        OutputFormat::Json => {
            let output = ViewOutput {
                total,
                shown: window.len(),
                older_remaining,
                messages: window,
            };
            let json = serde_json::to_string_pretty(&output).context("Failed to serialize view")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            println!(
                "# showing {} of {} messages ({} older)",
                window.len(),
                total,
                older_remaining
            );
            for line in pane.lines() {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn render_lines(messages: &[Message], cards: &ToolCardRegistry) -> Vec<String> {
    messages
        .iter()
        .flat_map(|message| render_message(message, cards))
        .collect()
}
