use std::collections::BTreeMap;

/// Numeric field value of a metric point.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

/// One named, timestamped, tagged set of numeric fields.
///
/// Points from the same measurement cycle share one tag set; the timestamp is
/// optional because ping points let the store assign arrival time.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    measurement: String,
    fields: BTreeMap<String, FieldValue>,
    tags: BTreeMap<String, String>,
    timestamp_ms: Option<i64>,
}

impl MetricPoint {
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            fields: BTreeMap::new(),
            tags: BTreeMap::new(),
            timestamp_ms: None,
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn timestamp_ms(mut self, millis: i64) -> Self {
        self.timestamp_ms = Some(millis);
        self
    }

    pub fn add_tag(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(name.into(), value.into());
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp_ms
    }

    /// Encode as a single InfluxDB line-protocol line (millisecond precision).
    pub fn to_line_protocol(&self) -> String {
        let mut line = escape_measurement(&self.measurement);
        for (name, value) in &self.tags {
            line.push(',');
            line.push_str(&escape_key(name));
            line.push('=');
            line.push_str(&escape_key(value));
        }
        line.push(' ');
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|(name, value)| format!("{}={}", escape_key(name), render_field(value)))
            .collect();
        line.push_str(&fields.join(","));
        if let Some(ts) = self.timestamp_ms {
            line.push(' ');
            line.push_str(&ts.to_string());
        }
        line
    }
}

fn render_field(value: &FieldValue) -> String {
    match value {
        FieldValue::Float(v) => format!("{v}"),
        FieldValue::Integer(v) => format!("{v}i"),
    }
}

fn escape_measurement(name: &str) -> String {
    name.replace(',', "\\,").replace(' ', "\\ ")
}

// Tag keys, tag values and field keys share the same escaping rules.
fn escape_key(name: &str) -> String {
    name.replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_fields_tags_and_timestamp() {
        let mut point = MetricPoint::new("download")
            .field("bandwidth", 800.0)
            .field("bytes", 500_000_000_i64)
            .timestamp_ms(1_714_564_800_000);
        point.add_tag("namespace", "home");

        assert_eq!(
            point.to_line_protocol(),
            "download,namespace=home bandwidth=800,bytes=500000000i 1714564800000"
        );
    }

    #[test]
    fn omits_timestamp_when_unset() {
        let mut point = MetricPoint::new("pings").field("success", 1_i64);
        point.add_tag("target", "1.1.1.1");

        assert_eq!(point.to_line_protocol(), "pings,target=1.1.1.1 success=1i");
    }

    #[test]
    fn escapes_reserved_characters() {
        let mut point = MetricPoint::new("my measurement").field("value", 1.5);
        point.add_tag("server name", "Example, Inc=Test");

        assert_eq!(
            point.to_line_protocol(),
            "my\\ measurement,server\\ name=Example\\,\\ Inc\\=Test value=1.5"
        );
    }

    #[test]
    fn tags_are_encoded_in_deterministic_order() {
        let mut point = MetricPoint::new("ping").field("latency", 12.3);
        point.add_tag("namespace", "home");
        point.add_tag("isp", "Example ISP");

        assert_eq!(
            point.to_line_protocol(),
            "ping,isp=Example\\ ISP,namespace=home latency=12.3"
        );
    }
}
