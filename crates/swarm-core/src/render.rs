//! Rendering
//!
//! Renderers are injected into the episode by the driver. The graph engine
//! never holds one, so it runs headless by default.

use std::io::Write;

use swarm_events::{AgentKind, AgentState, GridPos};

use crate::engine::GraphKind;
use crate::graph::RelationGraph;

/// Everything a renderer needs to draw one tick
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub tick: u64,
    pub dim: u32,
    pub agents: &'a [AgentState],
    pub graph: &'a RelationGraph,
    pub kind: GraphKind,
    pub target: GridPos,
    /// Swarm centroid relative to the target
    pub arrangement: [f64; 2],
}

/// Errors that can occur while drawing a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("render output failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A sink for rendered frames
pub trait GraphRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), RenderError>;
}

/// Draws the grid as text: `T` truthful, `A` adversarial, `X` target.
pub struct AsciiRenderer<W: Write> {
    out: W,
    show_edges: bool,
}

impl<W: Write> AsciiRenderer<W> {
    pub fn new(out: W, show_edges: bool) -> Self {
        Self { out, show_edges }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn cell_char(frame: &RenderFrame<'_>, pos: GridPos) -> char {
        match frame.agents.iter().find(|a| a.pos == pos) {
            Some(agent) => match agent.kind {
                AgentKind::Truthful => 'T',
                AgentKind::Adversarial => 'A',
            },
            None if pos == frame.target => 'X',
            None => '.',
        }
    }
}

impl<W: Write> GraphRenderer for AsciiRenderer<W> {
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), RenderError> {
        writeln!(
            self.out,
            "tick {} | {:?} graph | {} edges | arrangement ({:.2}, {:.2})",
            frame.tick,
            frame.kind,
            frame.graph.edge_count(),
            frame.arrangement[0],
            frame.arrangement[1]
        )?;

        for y in 0..frame.dim as i32 {
            let row: String = (0..frame.dim as i32)
                .map(|x| Self::cell_char(frame, GridPos::new(x, y)))
                .collect();
            writeln!(self.out, "{}", row)?;
        }

        if self.show_edges {
            for (from, to) in frame.graph.iter() {
                if to.is_empty() {
                    continue;
                }
                let targets: Vec<&str> = to.iter().map(|id| id.as_str()).collect();
                writeln!(self.out, "  {} -> {}", from, targets.join(", "))?;
            }
        }

        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_events::AgentId;

    fn render_to_string(show_edges: bool) -> String {
        let agents = vec![
            AgentState::truthful("truthful_0", (0, 0)),
            AgentState::adversarial("adversarial_0", (2, 0)),
        ];
        let ids: Vec<AgentId> = agents.iter().map(|a| a.id.clone()).collect();
        let graph = RelationGraph::complete(&ids);
        let frame = RenderFrame {
            tick: 4,
            dim: 3,
            agents: &agents,
            graph: &graph,
            kind: GraphKind::Communication,
            target: GridPos::new(1, 1),
            arrangement: [0.0, -1.0],
        };

        let mut renderer = AsciiRenderer::new(Vec::new(), show_edges);
        renderer.render(&frame).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_ascii_grid_layout() {
        let output = render_to_string(false);
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("tick 4 | Communication graph | 2 edges"));
        assert_eq!(lines[1], "T.A");
        assert_eq!(lines[2], ".X.");
        assert_eq!(lines[3], "...");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_ascii_edges_listed() {
        let output = render_to_string(true);

        assert!(output.contains("  truthful_0 -> adversarial_0"));
        assert!(output.contains("  adversarial_0 -> truthful_0"));
    }
}
