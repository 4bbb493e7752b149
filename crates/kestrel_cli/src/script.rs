//! Scripted input replay
//!
//! A script is one step per line. Blank lines and `#` comments are skipped.
//!
//! ```text
//! down            # any key name understood by KeyCode::from_name
//! type:ban        # query text for a combobox, typeahead keys otherwise
//! click:banana    # pointer activation of an option value
//! hover:cherry
//! wait:1000       # advance the clock (typeahead timeout)
//! open | close | trigger | outside | select-all | clear
//! ```

use std::fmt;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use kestrel_cn::{CloseReason, SelectBuilder, SelectController, WidgetDefinition};
use kestrel_core::{EventOutcome, KeyCode, KeyEvent};
use kestrel_overlay::{overlay_registry, FloatingPosition, Point, Rect, Size};

/// Milliseconds between two scripted keystrokes
const KEY_INTERVAL_MS: u64 = 50;

const ROW_HEIGHT: f32 = 32.0;
const WINDOW: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);
const TRIGGER: Rect = Rect::new(16.0, 16.0, 240.0, 32.0);
const OUTSIDE: Point = Point::new(790.0, 590.0);

// =============================================================================
// Steps
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Key(KeyCode),
    Type(String),
    Click(String),
    Hover(String),
    Wait(u64),
    Open,
    Close,
    Trigger,
    Outside,
    SelectAll,
    Clear,
}

impl Step {
    pub fn parse(source: &str) -> Result<Self> {
        if let Some((verb, arg)) = source.split_once(':') {
            return match verb {
                "type" => Ok(Step::Type(arg.to_string())),
                "click" => Ok(Step::Click(arg.to_string())),
                "hover" => Ok(Step::Hover(arg.to_string())),
                "wait" => {
                    let ms = arg
                        .trim()
                        .parse()
                        .with_context(|| format!("invalid wait duration '{}'", arg))?;
                    Ok(Step::Wait(ms))
                }
                _ => bail!("unknown step '{}'", verb),
            };
        }

        let step = match source {
            "open" => Step::Open,
            "close" => Step::Close,
            "trigger" => Step::Trigger,
            "outside" => Step::Outside,
            "select-all" => Step::SelectAll,
            "clear" => Step::Clear,
            name => match KeyCode::from_name(name) {
                Some(key) => Step::Key(key),
                None => bail!("unknown step '{}'", name),
            },
        };
        Ok(step)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(key) => write!(f, "{:?}", key),
            Step::Type(text) => write!(f, "type:{}", text),
            Step::Click(value) => write!(f, "click:{}", value),
            Step::Hover(value) => write!(f, "hover:{}", value),
            Step::Wait(ms) => write!(f, "wait:{}", ms),
            Step::Open => f.write_str("open"),
            Step::Close => f.write_str("close"),
            Step::Trigger => f.write_str("trigger"),
            Step::Outside => f.write_str("outside"),
            Step::SelectAll => f.write_str("select-all"),
            Step::Clear => f.write_str("clear"),
        }
    }
}

/// Parse a whole script
pub fn parse_script(source: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let line = match line.split_once('#') {
            Some((code, _)) => code,
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        steps.push(Step::parse(line).with_context(|| format!("line {}", idx + 1))?);
    }
    Ok(steps)
}

// =============================================================================
// Session
// =============================================================================

/// A controller driven by scripted steps with a simulated clock
pub struct Session {
    controller: SelectController<String>,
    clock_ms: u64,
}

impl Session {
    #[track_caller]
    pub fn new(definition: &WidgetDefinition) -> Self {
        let overlays = overlay_registry();
        let mut controller = SelectBuilder::from_definition(definition).build(&overlays);
        controller.set_trigger_bounds(Some(TRIGGER));
        Self {
            controller,
            clock_ms: 0,
        }
    }

    pub fn controller(&self) -> &SelectController<String> {
        &self.controller
    }

    pub fn apply(&mut self, step: &Step) -> EventOutcome {
        let outcome = match step {
            Step::Key(key) => self.key(*key),
            Step::Type(text) => {
                if self.controller.config().searchable {
                    let query = format!("{}{}", self.controller.query(), text);
                    self.controller.set_query(query);
                    EventOutcome::Handled
                } else {
                    text.chars()
                        .map(|c| self.key(KeyCode::Char(c)))
                        .fold(EventOutcome::Ignored, |acc, outcome| {
                            if outcome.is_handled() {
                                outcome
                            } else {
                                acc
                            }
                        })
                }
            }
            Step::Click(value) => handled(self.controller.handle_option_activate(value)),
            Step::Hover(value) => {
                self.controller.handle_option_hover(value);
                EventOutcome::Handled
            }
            Step::Wait(ms) => {
                self.clock_ms += ms;
                EventOutcome::Handled
            }
            Step::Open => handled(self.controller.toggle_open(Some(true), None)),
            Step::Close => handled(self.controller.close(CloseReason::Explicit)),
            Step::Trigger => self.controller.handle_trigger_click(),
            Step::Outside => self.controller.handle_pointer_down(OUTSIDE),
            Step::SelectAll => handled(self.controller.select_all()),
            Step::Clear => handled(self.controller.clear_selection()),
        };
        self.sync_content_bounds();
        outcome
    }

    fn key(&mut self, key: KeyCode) -> EventOutcome {
        let event = KeyEvent::new(key).at(self.clock_ms);
        self.clock_ms += KEY_INTERVAL_MS;

        let outcome = self.controller.handle_key(event);
        // The host text field owns editing keys
        if outcome == EventOutcome::Ignored
            && key == KeyCode::Backspace
            && self.controller.config().searchable
        {
            let mut query = self.controller.query().to_string();
            if query.pop().is_some() {
                self.controller.set_query(query);
                return EventOutcome::Handled;
            }
        }
        outcome
    }

    fn sync_content_bounds(&mut self) {
        let bounds = self.content_size().and_then(|size| {
            self.controller
                .content_position(size, WINDOW)
                .map(|p| Rect::new(p.left, p.top, size.width, size.height.min(p.max_height)))
        });
        self.controller.set_content_bounds(bounds);
    }

    fn content_size(&self) -> Option<Size> {
        if !self.controller.is_open() {
            return None;
        }
        let rows = self.controller.visible_ids().len().max(1) as f32;
        Some(Size::new(TRIGGER.width(), rows * ROW_HEIGHT))
    }

    pub fn snapshot(&self, step: &Step, outcome: EventOutcome) -> Snapshot {
        let controller = &self.controller;
        let options = controller.render_options(|option, state| OptionRow {
            value: option.value().clone(),
            label: option.label().to_string(),
            disabled: state.disabled,
            selected: state.is_selected,
            highlighted: state.is_highlighted,
        });

        Snapshot {
            step: step.to_string(),
            handled: outcome.is_handled(),
            open: controller.is_open(),
            highlighted: controller.highlighted_option().map(|o| o.value().clone()),
            selected: controller.selected_values().iter().cloned().collect(),
            query: controller.query().to_string(),
            trigger: controller.trigger_text(),
            status: controller.status_text(),
            options,
            position: self
                .content_size()
                .and_then(|size| controller.content_position(size, WINDOW)),
        }
    }
}

fn handled(changed: bool) -> EventOutcome {
    if changed {
        EventOutcome::Handled
    } else {
        EventOutcome::Ignored
    }
}

// =============================================================================
// Snapshot
// =============================================================================

#[derive(Debug, Serialize)]
pub struct OptionRow {
    pub value: String,
    pub label: String,
    pub disabled: bool,
    pub selected: bool,
    pub highlighted: bool,
}

/// Widget state after one step
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub step: String,
    pub handled: bool,
    pub open: bool,
    pub highlighted: Option<String>,
    pub selected: Vec<String>,
    pub query: String,
    pub trigger: String,
    pub status: String,
    pub options: Vec<OptionRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<FloatingPosition>,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} -> {}",
            self.step,
            if self.handled { "handled" } else { "ignored" }
        )?;
        writeln!(
            f,
            "  trigger: {} ({})",
            self.trigger,
            if self.open { "open" } else { "closed" }
        )?;
        if !self.query.is_empty() {
            writeln!(f, "  query:   {:?}", self.query)?;
        }
        if self.open {
            for row in &self.options {
                let cursor = if row.highlighted { '>' } else { ' ' };
                let mark = if row.selected { '*' } else { ' ' };
                write!(f, "  {}{} {}", cursor, mark, row.label)?;
                if row.disabled {
                    write!(f, " (disabled)")?;
                }
                writeln!(f)?;
            }
            writeln!(f, "  status:  {}", self.status)?;
        }
        Ok(())
    }
}
