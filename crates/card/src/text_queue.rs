//! Sequencing of the card's title transitions.
//!
//! The card renders two stacked text lines. A transition slides the inactive
//! line in with the new text while the active one leaves; afterwards the two
//! swap roles. Requests that arrive mid-transition wait in a short queue.

use std::collections::VecDeque;

use foundation::time::Time;
use runtime::timer::Delay;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextLine {
    First,
    Second,
}

impl TextLine {
    pub fn other(self) -> TextLine {
        match self {
            TextLine::First => TextLine::Second,
            TextLine::Second => TextLine::First,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedText {
    pub text: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CardCommand {
    /// Jump `line` to its entry position without animating.
    PositionReset { line: TextLine, direction: Direction },
    StartTransition {
        entering: TextLine,
        leaving: TextLine,
        text: String,
        direction: Direction,
    },
    Committed { text: String, active: TextLine },
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextQueueConfig {
    pub capacity: usize,
    pub settle_ms: f64,
}

impl Default for TextQueueConfig {
    fn default() -> Self {
        Self {
            capacity: 2,
            settle_ms: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Stage {
    Idle,
    /// Reset emitted at `since`; the animated entrance waits for a later tick.
    Resetting { entry: QueuedText, since: Time },
    Transitioning(QueuedText),
    Settling,
}

#[derive(Debug)]
pub struct TextQueue {
    config: TextQueueConfig,
    current: String,
    active: TextLine,
    stage: Stage,
    queue: VecDeque<QueuedText>,
    settle: Delay,
    commands: Vec<CardCommand>,
}

impl TextQueue {
    pub fn new(config: TextQueueConfig, initial: impl Into<String>) -> Self {
        Self {
            config,
            current: initial.into(),
            active: TextLine::First,
            stage: Stage::Idle,
            queue: VecDeque::new(),
            settle: Delay::idle(),
            commands: Vec::new(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn active_line(&self) -> TextLine {
        self.active
    }

    pub fn queued(&self) -> impl Iterator<Item = &QueuedText> {
        self.queue.iter()
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.stage == Stage::Idle && self.queue.is_empty()
    }

    pub fn enqueue(&mut self, text: impl Into<String>, direction: Direction, now: Time) {
        let entry = QueuedText {
            text: text.into(),
            direction,
        };
        if self.stage == Stage::Idle {
            self.start(entry, now);
            return;
        }
        self.queue.push_back(entry);
        while self.queue.len() > self.config.capacity {
            if let Some(dropped) = self.queue.pop_front() {
                tracing::trace!(text = %dropped.text, "card: queued text dropped");
            }
        }
    }

    pub fn tick(&mut self, now: Time) {
        if let Stage::Resetting { entry, since } = &self.stage
            && now.ms() > since.ms()
        {
            let entry = entry.clone();
            self.begin_transition(entry);
        }
        if self.settle.fire_if_due(now) {
            self.stage = Stage::Idle;
            if let Some(next) = self.queue.pop_front() {
                self.start(next, now);
            }
        }
    }

    /// The host reports that the running transition has finished animating.
    pub fn on_transition_finished(&mut self, now: Time) {
        if !matches!(self.stage, Stage::Transitioning(_)) {
            return;
        }
        let Stage::Transitioning(entry) = std::mem::replace(&mut self.stage, Stage::Settling) else {
            return;
        };
        self.current = entry.text;
        self.active = self.active.other();
        self.commands.push(CardCommand::Committed {
            text: self.current.clone(),
            active: self.active,
        });
        self.settle.restart(now, self.config.settle_ms);
    }

    pub fn drain_commands(&mut self) -> Vec<CardCommand> {
        std::mem::take(&mut self.commands)
    }

    fn start(&mut self, entry: QueuedText, now: Time) {
        match entry.direction {
            Direction::Forward => self.begin_transition(entry),
            Direction::Backward => {
                self.commands.push(CardCommand::PositionReset {
                    line: self.active.other(),
                    direction: entry.direction,
                });
                self.stage = Stage::Resetting { entry, since: now };
            }
        }
    }

    fn begin_transition(&mut self, entry: QueuedText) {
        tracing::debug!(text = %entry.text, direction = ?entry.direction, "card: transition");
        self.commands.push(CardCommand::StartTransition {
            entering: self.active.other(),
            leaving: self.active,
            text: entry.text.clone(),
            direction: entry.direction,
        });
        self.stage = Stage::Transitioning(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::{CardCommand, Direction, TextLine, TextQueue, TextQueueConfig};
    use foundation::time::Time;
    use pretty_assertions::assert_eq;

    fn queue() -> TextQueue {
        TextQueue::new(TextQueueConfig::default(), "Start")
    }

    #[test]
    fn forward_transition_commits_and_flips() {
        let mut q = queue();
        q.enqueue("Obelisco", Direction::Forward, Time(0.0));
        assert_eq!(
            q.drain_commands(),
            vec![CardCommand::StartTransition {
                entering: TextLine::Second,
                leaving: TextLine::First,
                text: "Obelisco".to_string(),
                direction: Direction::Forward,
            }]
        );
        q.on_transition_finished(Time(400.0));
        assert_eq!(q.current(), "Obelisco");
        assert_eq!(q.active_line(), TextLine::Second);
        q.tick(Time(410.0));
        assert!(q.is_idle());
    }

    #[test]
    fn backward_resets_one_frame_before_animating() {
        let mut q = queue();
        q.enqueue("Torre", Direction::Backward, Time(0.0));
        q.tick(Time(0.0));
        assert_eq!(
            q.drain_commands(),
            vec![CardCommand::PositionReset {
                line: TextLine::Second,
                direction: Direction::Backward
            }]
        );
        q.tick(Time(16.0));
        assert!(matches!(
            q.drain_commands().as_slice(),
            [CardCommand::StartTransition { direction: Direction::Backward, .. }]
        ));
    }

    #[test]
    fn queued_backward_entry_also_gets_its_own_reset_frame() {
        let mut q = queue();
        q.enqueue("a", Direction::Forward, Time(0.0));
        q.enqueue("b", Direction::Backward, Time(5.0));
        q.drain_commands();
        q.on_transition_finished(Time(100.0));
        q.tick(Time(110.0));
        let commands = q.drain_commands();
        assert!(matches!(
            commands.as_slice(),
            [CardCommand::Committed { .. }, CardCommand::PositionReset { .. }]
        ));
        q.tick(Time(110.0));
        assert_eq!(q.drain_commands(), vec![]);
        q.tick(Time(126.0));
        assert!(matches!(
            q.drain_commands().as_slice(),
            [CardCommand::StartTransition { text, .. }] if text == "b"
        ));
    }

    #[test]
    fn rapid_enqueues_keep_latest_two() {
        let mut q = queue();
        for (i, t) in ["1", "2", "3", "4", "5"].iter().enumerate() {
            q.enqueue(*t, Direction::Forward, Time(i as f64));
        }
        assert!(q.queued_len() <= 2);
        let queued: Vec<_> = q.queued().map(|e| e.text.as_str()).collect();
        assert_eq!(queued, vec!["4", "5"]);

        let mut now = 10.0;
        for _ in 0..10 {
            q.on_transition_finished(Time(now));
            now += 10.0;
            q.tick(Time(now));
            now += 1.0;
        }
        assert_eq!(q.current(), "5");
        assert!(q.is_idle());
    }

    #[test]
    fn next_entry_waits_for_settle_delay() {
        let mut q = queue();
        q.enqueue("a", Direction::Forward, Time(0.0));
        q.enqueue("b", Direction::Forward, Time(5.0));
        q.drain_commands();
        q.on_transition_finished(Time(100.0));
        q.tick(Time(105.0));
        assert!(matches!(q.drain_commands().as_slice(), [CardCommand::Committed { .. }]));
        q.tick(Time(110.0));
        assert!(matches!(
            q.drain_commands().as_slice(),
            [CardCommand::StartTransition { .. }]
        ));
    }
}
