use std::fmt;

/// One of the four SWOT categories. Each gets its own table in a strategy report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    Strengths,
    Weaknesses,
    Opportunities,
    Threats,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Strengths,
        Quadrant::Weaknesses,
        Quadrant::Opportunities,
        Quadrant::Threats,
    ];

    /// Column label of the quadrant item in the report table.
    pub fn column(self) -> &'static str {
        match self {
            Quadrant::Strengths => "Strength",
            Quadrant::Weaknesses => "Weakness",
            Quadrant::Opportunities => "Opportunity",
            Quadrant::Threats => "Threat",
        }
    }

    /// Short rule of thumb for how to treat the quadrant.
    pub fn motto(self) -> &'static str {
        match self {
            Quadrant::Strengths => "Build upon them and grow",
            Quadrant::Weaknesses => "Don't damage the core",
            Quadrant::Opportunities => "Make a few bets",
            Quadrant::Threats => "Be ready for undesirable changes",
        }
    }

    /// The `###` heading the report section should carry.
    pub fn heading(self) -> &'static str {
        match self {
            Quadrant::Strengths => "Building on strengths can immediately improve the business",
            Quadrant::Weaknesses => "Addressing weaknesses to strengthen the core business",
            Quadrant::Opportunities => "Taking advantage of opportunities whenever possible",
            Quadrant::Threats => "Building resilience to threats is always a good idea",
        }
    }

    pub fn goal(self) -> &'static str {
        match self {
            Quadrant::Strengths => "improve",
            Quadrant::Weaknesses => "mitigate weaknesses",
            Quadrant::Opportunities => "grow new revenue",
            Quadrant::Threats => "become more resilient to threats",
        }
    }

    fn strategy_kind(self) -> &'static str {
        match self {
            Quadrant::Strengths | Quadrant::Weaknesses => "business strategy",
            Quadrant::Opportunities => "growth strategy",
            Quadrant::Threats => "resilience strategy",
        }
    }

    fn item_hint(self) -> &'static str {
        match self {
            Quadrant::Strengths => "strength that is being built upon",
            Quadrant::Weaknesses => "weakness that is being addressed",
            Quadrant::Opportunities => "opportunity that is being built upon",
            Quadrant::Threats => "threat that is being addressed",
        }
    }

    /// `| Title | Strength | Description | Example |`
    pub fn table_header(self) -> String {
        format!("| Title | {} | Description | Example |", self.column())
    }

    pub fn table_separator(self) -> String {
        format!(
            "| ----- | {} | ----------- | ------- |",
            "-".repeat(self.column().len())
        )
    }

    /// Placeholder row describing what each cell should hold.
    pub fn example_row(self) -> String {
        format!(
            "| concise name of the {} | {} | a short description of the strategy | example |",
            self.strategy_kind(),
            self.item_hint()
        )
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quadrant::Strengths => "Strengths",
            Quadrant::Weaknesses => "Weaknesses",
            Quadrant::Opportunities => "Opportunities",
            Quadrant::Threats => "Threats",
        };
        f.write_str(name)
    }
}
