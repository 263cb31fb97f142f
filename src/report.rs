//! Structural inspection of a strategy report.
//!
//! Reports are rendered exactly as the model wrote them. The outline is only
//! used to log when a quadrant table is missing.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::quadrant::Quadrant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportOutline {
    /// Number of markdown tables the renderer recognizes.
    pub table_count: usize,
    /// Quadrants whose table header matched `Title | <item> | Description | Example`, in order of appearance.
    pub quadrants: Vec<Quadrant>,
}

impl ReportOutline {
    pub fn inspect(markdown: &str) -> Self {
        let mut outline = ReportOutline::default();
        let mut header: Option<Vec<String>> = None;

        for event in Parser::new_ext(markdown, Options::ENABLE_TABLES) {
            match event {
                Event::Start(Tag::Table(_)) => outline.table_count += 1,
                Event::Start(Tag::TableHead) => header = Some(Vec::new()),
                Event::Start(Tag::TableCell) => {
                    if let Some(cells) = header.as_mut() {
                        cells.push(String::new());
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some(cell) = header.as_mut().and_then(|cells| cells.last_mut()) {
                        cell.push_str(&text);
                    }
                }
                Event::End(TagEnd::TableHead) => {
                    let cells = header.take().unwrap_or_default();
                    if let Some(quadrant) = quadrant_for_header(&cells) {
                        if !outline.quadrants.contains(&quadrant) {
                            outline.quadrants.push(quadrant);
                        }
                    }
                }
                _ => {}
            }
        }
        outline
    }

    pub fn missing(&self) -> Vec<Quadrant> {
        Quadrant::ALL
            .into_iter()
            .filter(|q| !self.quadrants.contains(q))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

fn quadrant_for_header(cells: &[String]) -> Option<Quadrant> {
    let normalized: Vec<String> = cells.iter().map(|c| c.trim().to_lowercase()).collect();
    if normalized.len() != 4
        || normalized[0] != "title"
        || normalized[2] != "description"
        || normalized[3] != "example"
    {
        return None;
    }
    Quadrant::ALL.into_iter().find(|q| {
        normalized[1] == q.column().to_lowercase() || normalized[1] == q.to_string().to_lowercase()
    })
}
