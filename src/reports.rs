use crate::errors::*;
use crate::timelines::*;

use std::io::Write;
use std::time::Duration;

/// Consume an aggregated timeline.
pub trait ReportWriter {
    /// Write the complete report of a timeline, given the time it took to compute it.
    fn write_report(&mut self, timeline: &Timeline, elapsed: Duration) -> Result<(), TracerError>;
}

/// Write a timeline as a nested tag document.
///
/// Each state is a `State` element with one `Agent` element per agent; the actions between
/// consecutive states are `Action` elements with one `Agent` element per event.
pub struct XmlReport<W: Write> {
    output: W,
}

impl<W: Write> XmlReport<W> {
    /// Create a writer into some output.
    pub fn new(output: W) -> Self {
        XmlReport { output }
    }

    /// Return the underlying output.
    pub fn into_inner(self) -> W {
        self.output
    }

    fn write_state(&mut self, state: &TimelineState) -> Result<(), TracerError> {
        writeln!(self.output, "    <State>")?;
        for agent in state.agents.iter() {
            let milestone = agent
                .milestone
                .as_ref()
                .map(|milestone| milestone.name.as_str())
                .unwrap_or("");
            let task = agent.task.as_deref().unwrap_or("");

            writeln!(self.output, "        <Agent id=\"{}\">", agent.id)?;
            writeln!(self.output, "            <Milestone>{}</Milestone>", escape(milestone))?;
            writeln!(self.output, "            <Task>{}</Task>", escape(task))?;
            writeln!(self.output, "            <Finish>")?;
            for finished in agent.finished_tasks.iter() {
                writeln!(self.output, "                <Task>{}</Task>", escape(finished))?;
            }
            writeln!(self.output, "            </Finish>")?;
            writeln!(self.output, "            <Iteration>{}</Iteration>", agent.iteration)?;
            writeln!(self.output, "        </Agent>")?;
        }
        writeln!(self.output, "    </State>")?;
        Ok(())
    }

    fn write_action(&mut self, action: &TimelineAction) -> Result<(), TracerError> {
        writeln!(self.output, "    <Action>")?;
        for event in action.agents.iter() {
            writeln!(self.output, "        <Agent id=\"{}\">", event.agent_id)?;
            writeln!(self.output, "            <Type>{}</Type>", escape(&event.label))?;
            writeln!(self.output, "            <Target>{}</Target>", escape(&event.target))?;
            writeln!(
                self.output,
                "            <Time>{}-{}</Time>",
                event.interval.0, event.interval.1
            )?;
            writeln!(self.output, "        </Agent>")?;
        }
        writeln!(self.output, "    </Action>")?;
        Ok(())
    }
}

impl<W: Write> ReportWriter for XmlReport<W> {
    fn write_report(&mut self, timeline: &Timeline, elapsed: Duration) -> Result<(), TracerError> {
        writeln!(self.output, "<?xml version=\"1.0\" encoding=\"utf-8\"?>")?;
        writeln!(
            self.output,
            "<Traces result=\"{}\">Time: {}ms",
            timeline.result(),
            elapsed.as_millis()
        )?;

        for (index, state) in timeline.states.iter().enumerate() {
            self.write_state(state)?;
            if let Some(action) = timeline.actions.get(index) {
                if index + 1 < timeline.states.len() {
                    self.write_action(action)?;
                }
            }
        }

        writeln!(self.output, "</Traces>")?;
        self.output.flush()?;
        Ok(())
    }
}

/// Escape the characters that are special in tag documents.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(character),
        }
    }
    escaped
}
