/// Test utilities for building raw ADCP dumps
#[allow(dead_code)]
pub struct AdcpLogBuilder {
    lines: Vec<String>,
}

#[allow(dead_code)]
impl AdcpLogBuilder {
    /// Create an empty dump
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a start-of-collection marker
    pub fn start(mut self) -> Self {
        self.lines.push("111111".to_string());
        self
    }

    /// Add an end-of-data marker
    pub fn end_data(mut self) -> Self {
        self.lines.push("0.000000".to_string());
        self
    }

    /// Add an end-of-collection marker
    pub fn end(mut self) -> Self {
        self.lines.push("999999".to_string());
        self
    }

    /// Add a depth/value line
    pub fn point(mut self, depth: f64, value: f64) -> Self {
        self.lines.push(format!("{:.2} {:.2}", depth, value));
        self
    }

    /// Add `count` depth/value lines with depth = index and value = 10 * index
    pub fn points(mut self, count: usize) -> Self {
        for i in 0..count {
            self = self.point(i as f64, 10.0 * i as f64);
        }
        self
    }

    /// Add a two-value metadata line
    pub fn pair(mut self, first: f64, second: f64) -> Self {
        self.lines.push(format!("{} {}", first, second));
        self
    }

    /// Add a single-value (vwc) metadata line
    pub fn vwc(mut self, value: f64) -> Self {
        self.lines.push(format!("{}", value));
        self
    }

    /// Add the eight metadata lines the instrument writes after a cast
    pub fn full_metadata(self) -> Self {
        self.pair(40.0, -70.0)
            .pair(3.5, 6.0)
            .pair(15.0, 2024.0)
            .pair(12.0, 30.0)
            .pair(45.0, 9.0)
            .pair(0.8, 75.2)
            .pair(0.0, 101.0)
            .pair(0.01, 4.0)
    }

    /// Add an arbitrary line verbatim
    pub fn line(mut self, raw: &str) -> Self {
        self.lines.push(raw.to_string());
        self
    }

    /// The dump as individual lines
    pub fn lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    /// The dump joined with LF endings
    pub fn build(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// The dump joined with CRLF endings
    pub fn build_crlf(&self) -> String {
        let mut text = self.lines.join("\r\n");
        text.push_str("\r\n");
        text
    }
}
