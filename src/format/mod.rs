//! Output formatting for product reports and menu listings (text, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::report::badges::BULLET;
use crate::report::{FormattedReport, SectionKind};
use crate::site::models::MenuItem;
use serde::Serialize;

/// Header row of the CSV menu listing.
pub const MENU_CSV_HEADER: &str = "Menu Item,Image URL";

#[derive(Serialize)]
struct ReportJson<'a> {
    query: &'a str,
    sections: Vec<SectionJson<'a>>,
    text: String,
}

#[derive(Serialize)]
struct MessageJson<'a> {
    query: &'a str,
    error: &'a str,
}

#[derive(Serialize)]
struct SectionJson<'a> {
    section: SectionKind,
    label: &'a str,
    text: &'a str,
}

/// Formats reports and menu listings for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a product report.
    pub fn format_report(&self, report: &FormattedReport) -> String {
        match self.format {
            OutputFormat::Text => report.render(),
            OutputFormat::Json => self.json_report(report),
            OutputFormat::Markdown => self.markdown_report(report),
            OutputFormat::Csv => self.csv_report(report),
        }
    }

    /// Formats the reply shown in place of a report when a lookup fails.
    pub fn format_message(&self, query: &str, message: &str) -> String {
        match self.format {
            OutputFormat::Text => message.to_string(),
            OutputFormat::Json => {
                let json = MessageJson { query, error: message };
                serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Markdown => format!("## {}\n\n*{}*", query, message),
            OutputFormat::Csv => format!("section,text\nerror,{}", csv_escape(message)),
        }
    }

    /// Formats a menu listing.
    pub fn format_menu(&self, items: &[MenuItem]) -> String {
        if items.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => MENU_CSV_HEADER.to_string(),
                _ => "No menu items found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Text => self.table_menu(items),
            OutputFormat::Json => {
                serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Markdown => self.markdown_menu(items),
            OutputFormat::Csv => self.csv_menu(items),
        }
    }

    // Reports

    fn json_report(&self, report: &FormattedReport) -> String {
        let json = ReportJson {
            query: report.query(),
            sections: report
                .sections()
                .iter()
                .map(|s| SectionJson { section: s.kind, label: s.label(), text: &s.body })
                .collect(),
            text: report.render(),
        };
        serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string())
    }

    fn markdown_report(&self, report: &FormattedReport) -> String {
        let mut lines = vec![format!("## {}", report.query()), String::new()];

        if report.is_empty() {
            lines.push(format!("*{}*", report.render()));
            return lines.join("\n");
        }

        for section in report.sections() {
            match section.kind {
                SectionKind::Components => {
                    lines.push(format!("**{}**", section.label()));
                    lines.push(String::new());
                    lines.extend(section.body.lines().map(|line| {
                        format!("- {}", line.trim_start_matches(BULLET).trim())
                    }));
                }
                _ => lines.push(format!("**{}** {}", section.label(), section.body)),
            }
            lines.push(String::new());
        }

        lines.join("\n").trim_end().to_string()
    }

    fn csv_report(&self, report: &FormattedReport) -> String {
        let mut lines = vec!["section,text".to_string()];
        if report.is_empty() {
            lines.push(format!("no_details,{}", csv_escape(&report.render())));
        }
        for section in report.sections() {
            lines.push(format!("{},{}", section.kind, csv_escape(&section.body)));
        }
        lines.join("\n")
    }

    // Menu listings

    fn table_menu(&self, items: &[MenuItem]) -> String {
        let name_width = 40;

        let mut lines = Vec::new();
        lines.push(format!("{:<4}  {:<name_width$}  {}", "#", "Menu Item", "Image URL"));
        lines.push(format!("{:-<4}  {:-<name_width$}  {:-<40}", "", "", ""));

        for (i, item) in items.iter().enumerate() {
            lines.push(format!(
                "{:<4}  {:<name_width$}  {}",
                i + 1,
                truncate(&item.name, name_width),
                item.image_url.as_deref().unwrap_or("N/A")
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} items", items.len()));

        lines.join("\n")
    }

    fn markdown_menu(&self, items: &[MenuItem]) -> String {
        let mut lines: Vec<String> = items
            .iter()
            .map(|item| match &item.image_url {
                Some(image) => format!("- {} ([image]({}))", item.name, image),
                None => format!("- {}", item.name),
            })
            .collect();

        lines.push(String::new());
        lines.push(format!("*{} menu items found*", items.len()));

        lines.join("\n")
    }

    fn csv_menu(&self, items: &[MenuItem]) -> String {
        let mut lines = vec![MENU_CSV_HEADER.to_string()];
        for item in items {
            lines.push(format!(
                "{},{}",
                csv_escape(&item.name),
                csv_escape(item.image_url.as_deref().unwrap_or_default())
            ));
        }
        lines.join("\n")
    }
}

/// Shortens `s` to `max` characters, marking the cut with `...`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max.saturating_sub(3)).collect::<String>())
    } else {
        s.to_string()
    }
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::format_report;
    use crate::site::models::{ProductQuery, RawProductInfo};

    fn make_report() -> FormattedReport {
        let info = RawProductInfo {
            badge_text: "4 PCS. | SIDE ITEM FRIES".to_string(),
            price: "฿ 199".to_string(),
            description: "Four pieces of crispy chicken, with fries".to_string(),
            ingredients: String::new(),
        };
        format_report(&info, &ProductQuery::new("Zinger Box"))
    }

    fn make_empty_report() -> FormattedReport {
        format_report(&RawProductInfo::default(), &ProductQuery::new("Wingz"))
    }

    fn make_items() -> Vec<MenuItem> {
        vec![
            MenuItem {
                name: "Zinger Box".to_string(),
                image_url: Some("https://cdn.kfc.co.th/zinger.jpg".to_string()),
            },
            MenuItem { name: "Bucket, Large".to_string(), image_url: None },
        ]
    }

    // Report tests

    #[test]
    fn test_text_report_is_plain_render() {
        let report = make_report();
        assert_eq!(Formatter::new(OutputFormat::Text).format_report(&report), report.render());
    }

    #[test]
    fn test_json_report() {
        let output = Formatter::new(OutputFormat::Json).format_report(&make_report());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["query"], "Zinger Box");
        assert_eq!(value["sections"][0]["section"], "components");
        assert_eq!(value["sections"][1]["text"], "฿ 199");
        assert!(value["text"].as_str().unwrap().starts_with("🍗 ในชุดประกอบด้วย:"));
    }

    #[test]
    fn test_json_empty_report_keeps_message() {
        let output = Formatter::new(OutputFormat::Json).format_report(&make_empty_report());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["sections"].as_array().map(Vec::len), Some(0));
        assert_eq!(value["text"], "พบเมนู 'Wingz' แต่ไม่สามารถดึงข้อมูลรายละเอียดได้");
    }

    #[test]
    fn test_markdown_report() {
        let output = Formatter::new(OutputFormat::Markdown).format_report(&make_report());

        assert!(output.starts_with("## Zinger Box\n"));
        assert!(output.contains("- 4 PCS.\n- SIDE ITEM FRIES"));
        assert!(output.contains("**💰 ราคา:** ฿ 199"));
        assert!(!output.ends_with('\n'));
    }

    #[test]
    fn test_markdown_empty_report() {
        let output = Formatter::new(OutputFormat::Markdown).format_report(&make_empty_report());
        assert!(output.contains("*พบเมนู 'Wingz'"));
    }

    #[test]
    fn test_csv_report() {
        let output = Formatter::new(OutputFormat::Csv).format_report(&make_report());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "section,text");
        assert_eq!(lines[1], "components,\"• 4 PCS.");
        assert!(output.contains("price,฿ 199"));
        assert!(output.contains("description,\"Four pieces of crispy chicken, with fries\""));
    }

    #[test]
    fn test_csv_empty_report() {
        let output = Formatter::new(OutputFormat::Csv).format_report(&make_empty_report());
        assert_eq!(
            output,
            "section,text\nno_details,พบเมนู 'Wingz' แต่ไม่สามารถดึงข้อมูลรายละเอียดได้"
        );
    }

    #[test]
    fn test_format_message() {
        let message = "ไม่พบเมนู 'Pizza' ในระบบ หรือเซิร์ฟเวอร์ตอบสนองช้า";

        assert_eq!(Formatter::new(OutputFormat::Text).format_message("Pizza", message), message);

        let output = Formatter::new(OutputFormat::Json).format_message("Pizza", message);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["query"], "Pizza");
        assert_eq!(value["error"], message);

        let output = Formatter::new(OutputFormat::Markdown).format_message("Pizza", message);
        assert_eq!(output, format!("## Pizza\n\n*{}*", message));

        let output = Formatter::new(OutputFormat::Csv).format_message("Pizza, large", "a, b");
        assert_eq!(output, "section,text\nerror,\"a, b\"");
    }

    // Menu tests

    #[test]
    fn test_table_menu() {
        let output = Formatter::new(OutputFormat::Text).format_menu(&make_items());

        assert!(output.contains("Menu Item"));
        assert!(output.contains("Zinger Box"));
        assert!(output.contains("https://cdn.kfc.co.th/zinger.jpg"));
        assert!(output.contains("N/A"));
        assert!(output.contains("Total: 2 items"));
    }

    #[test]
    fn test_json_menu() {
        let output = Formatter::new(OutputFormat::Json).format_menu(&make_items());
        let items: Vec<MenuItem> = serde_json::from_str(&output).unwrap();
        assert_eq!(items, make_items());
    }

    #[test]
    fn test_markdown_menu() {
        let output = Formatter::new(OutputFormat::Markdown).format_menu(&make_items());
        assert!(output.contains("- Zinger Box ([image](https://cdn.kfc.co.th/zinger.jpg))"));
        assert!(output.contains("- Bucket, Large\n"));
        assert!(output.contains("*2 menu items found*"));
    }

    #[test]
    fn test_csv_menu() {
        let output = Formatter::new(OutputFormat::Csv).format_menu(&make_items());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Menu Item,Image URL");
        assert_eq!(lines[1], "Zinger Box,https://cdn.kfc.co.th/zinger.jpg");
        assert_eq!(lines[2], "\"Bucket, Large\",");
    }

    #[test]
    fn test_empty_menu() {
        assert_eq!(Formatter::new(OutputFormat::Json).format_menu(&[]), "[]");
        assert_eq!(Formatter::new(OutputFormat::Csv).format_menu(&[]), MENU_CSV_HEADER);
        assert_eq!(Formatter::new(OutputFormat::Text).format_menu(&[]), "No menu items found.");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("ไก่ทอดเคเอฟซี", 6), "ไก่...");
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("simple"), "simple");
        assert_eq!(csv_escape("with, comma"), "\"with, comma\"");
        assert_eq!(csv_escape("with \"quotes\""), "\"with \"\"quotes\"\"\"");
    }
}
