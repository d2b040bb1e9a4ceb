use std::fmt::{Display, Formatter};

use log::{debug, info, warn};

use crate::scene::PlacedShape;
use crate::spacial::{round_to, Point};

#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    pub number: u32,
    pub diameter: f64,
    /// drill positions in path coordinates
    pub locations: Vec<Point>,
}

/// Tools are numbered from 1 in the order their diameters are first seen, never sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct DrillTable {
    tools: Vec<Tool>,
    significant_digits: u32,
}

impl DrillTable {
    pub fn new(significant_digits: u32) -> Self {
        Self {
            tools: Vec::new(),
            significant_digits,
        }
    }

    pub fn add(&mut self, diameter: f64, location: Point) {
        let diameter = round_to(diameter, self.significant_digits);
        match self
            .tools
            .iter_mut()
            .find(|tool| tool.diameter == diameter)
        {
            Some(tool) => tool.locations.push(location),
            None => {
                let number = self.tools.len() as u32 + 1;
                debug!("assigned tool. number: T{}, diameter: {}", number, diameter);
                self.tools.push(Tool {
                    number,
                    diameter,
                    locations: vec![location],
                });
            }
        }
    }

    /// Collect drill shapes, the location of each is the sum of its ancestor translations.
    pub fn from_placed(placed: &[PlacedShape<'_>], significant_digits: u32) -> Self {
        let mut table = Self::new(significant_digits);
        for shape in placed {
            match shape.shape.drill_diameter() {
                Some(diameter) => table.add(diameter, shape.offset),
                None => warn!("ignoring non-drill shape on the drill sheet. id: {}", shape.shape.id()),
            }
        }
        table
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExcellonFile {
    pub name: String,
    pub lines: Vec<String>,
}

impl Display for ExcellonFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Fixed 6 decimal text with the decimal point removed.
fn coordinate(value: f64) -> String {
    // avoid "-0.000000"
    let value = match value == 0.0 {
        true => 0.0,
        false => value,
    };
    format!("{:.6}", value).replace('.', "")
}

#[profiling::function]
pub fn write(name: &str, table: &DrillTable) -> ExcellonFile {
    let mut lines = vec!["M48".to_string(), "METRIC,TZ".to_string(), "G90".to_string(), "M71".to_string()];
    lines.extend(
        table
            .tools
            .iter()
            .map(|tool| format!("T{}C{}", tool.number, tool.diameter)),
    );
    lines.push("%".to_string());

    for tool in &table.tools {
        lines.push(format!("T{}", tool.number));
        lines.extend(
            tool.locations
                .iter()
                // output y points up
                .map(|location| format!("X{}Y{}", coordinate(location.x), coordinate(-location.y))),
        );
    }
    lines.push("M30".to_string());

    match table.is_empty() {
        true => info!("no drills, writing header and trailer only. file: {}", name),
        false => info!(
            "generated excellon. file: {}, tools: {}, holes: {}",
            name,
            table.tools.len(),
            table
                .tools
                .iter()
                .map(|tool| tool.locations.len())
                .sum::<usize>()
        ),
    }

    ExcellonFile {
        name: name.to_string(),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_first_seen_tool_numbering() {
        // given
        let mut table = DrillTable::new(8);

        // when
        for (index, diameter) in [0.8, 0.4, 0.8, 1.2].iter().enumerate() {
            table.add(*diameter, Point::new(index as f64, 1.0));
        }

        // then
        let tools = table
            .tools()
            .iter()
            .map(|tool| (tool.number, tool.diameter, tool.locations.len()))
            .collect::<Vec<_>>();
        assert_eq!(tools, vec![(1, 0.8, 2), (2, 0.4, 1), (3, 1.2, 1)]);
        assert_eq!(table.tools()[0].locations, vec![Point::new(0.0, 1.0), Point::new(2.0, 1.0)]);
    }

    #[test]
    fn test_write() {
        // given
        let mut table = DrillTable::new(8);
        table.add(0.8, Point::new(2.0, 3.0));
        table.add(0.4, Point::new(0.5, -1.25));
        table.add(0.8, Point::new(7.0, 0.0));

        // when
        let file = write("board_drills", &table);

        // then
        assert_eq!(file.to_string(), indoc! {"
            M48
            METRIC,TZ
            G90
            M71
            T1C0.8
            T2C0.4
            %
            T1
            X2000000Y-3000000
            X7000000Y0000000
            T2
            X0500000Y1250000
            M30
        "});
    }

    #[test]
    fn test_empty_table() {
        // when
        let file = write("empty", &DrillTable::new(8));

        // then
        assert_eq!(file.lines, vec!["M48", "METRIC,TZ", "G90", "M71", "%", "M30"]);
    }

    #[rstest]
    #[case(1.5, "1500000")]
    #[case(-0.25, "-0250000")]
    #[case(-0.0, "0000000")]
    #[case(12.3456789, "12345679")]
    fn test_coordinate(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(coordinate(value), expected);
    }
}
