use chrono::{DateTime, NaiveDate, Utc};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::models::Rental;

pub const REPORT_TITLE: &str = "Rental Report";

const TABLE_HEADER: [&str; 6] = ["Apartment", "Rent/Day", "Days", "Total", "Start Date", "End Date"];

/// Диапазон дат отчёта. Пустая граница означает «без ограничения».
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Разбирает границы из query-параметров `YYYY-MM-DD`. Пустая строка
    /// равнозначна отсутствию границы, нечитаемая дата — ошибка валидации.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> AppResult<Self> {
        Ok(Self {
            start: parse_bound(start)?,
            end: parse_bound(end)?,
        })
    }

    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Запись без начала аренды проходит фильтр всегда: отсутствующая дата
    /// трактуется как «в любом диапазоне», а не как ошибка.
    pub fn contains(&self, timestamp: Option<DateTime<Utc>>) -> bool {
        let Some(ts) = timestamp else {
            return true;
        };
        let date = ts.date_naive();
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}

fn parse_bound(raw: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::Validation(format!("Неверный формат даты: {}", value))
            }),
    }
}

pub fn filter_rentals<'a>(records: &'a [Rental], range: &DateRange) -> Vec<&'a Rental> {
    records
        .iter()
        .filter(|r| range.contains(r.start_date))
        .collect()
}

/// Сумма total_price по отфильтрованным записям; отсутствующая цена — ноль.
pub fn total_revenue<'a>(records: impl IntoIterator<Item = &'a Rental>) -> Decimal {
    records
        .into_iter()
        .map(|r| r.total_price.unwrap_or_default())
        .sum()
}

fn format_money(value: Option<Decimal>) -> String {
    format!("{:.2}", value.unwrap_or_default())
}

fn format_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Строка таблицы отчёта. Отсутствующие поля не срывают экспорт:
/// каждое подменяется литералом «-», «0.00» или «0».
pub fn report_row(rental: &Rental) -> [String; 6] {
    [
        rental
            .apartment_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("-")
            .to_string(),
        format_money(rental.payment_amount),
        rental.days.unwrap_or(0).to_string(),
        format_money(rental.total_price),
        format_date(rental.start_date),
        format_date(rental.end_date),
    ]
}

/// Готовый к экспорту отчёт: отфильтрованные строки и итоги.
#[derive(Debug)]
pub struct RentalReport {
    pub generated_on: NaiveDate,
    pub range: DateRange,
    pub rows: Vec<[String; 6]>,
    pub record_count: usize,
    pub total_revenue: Decimal,
}

impl RentalReport {
    pub fn build(records: &[Rental], range: DateRange, generated_on: NaiveDate) -> Self {
        let filtered = filter_rentals(records, &range);
        let total = total_revenue(filtered.iter().copied());
        Self {
            generated_on,
            range,
            rows: filtered.iter().map(|r| report_row(r)).collect(),
            record_count: filtered.len(),
            total_revenue: total,
        }
    }

    /// Имя файла берёт дату на момент экспорта.
    pub fn filename(&self) -> String {
        format!("rental-report-{}.pdf", self.generated_on.format("%d-%m-%Y"))
    }

    pub fn render_pdf(&self) -> AppResult<Vec<u8>> {
        let (doc, page, layer) = PdfDocument::new(REPORT_TITLE, Mm(210.0), Mm(297.0), "report");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::Export(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::Export(e.to_string()))?;

        let columns = [14.0, 64.0, 94.0, 114.0, 144.0, 174.0];
        let mut current = doc.get_page(page).get_layer(layer);
        let mut y = 277.0;

        current.use_text(REPORT_TITLE, 20.0, Mm(14.0), Mm(y), &bold);
        y -= 10.0;
        current.use_text(
            format!("Generated on: {}", self.generated_on.format("%d/%m/%Y")),
            12.0,
            Mm(14.0),
            Mm(y),
            &font,
        );
        y -= 8.0;
        current.use_text(
            format!("Total Records: {}", self.record_count),
            12.0,
            Mm(14.0),
            Mm(y),
            &font,
        );
        y -= 8.0;
        if self.range.is_bounded() {
            current.use_text(format!("Period: {}", period_label(&self.range)), 12.0, Mm(14.0), Mm(y), &font);
            y -= 8.0;
        }

        y -= 4.0;
        for (i, header) in TABLE_HEADER.iter().enumerate() {
            current.use_text(*header, 10.0, Mm(columns[i]), Mm(y), &bold);
        }
        y -= 7.0;

        for row in &self.rows {
            if y < 20.0 {
                let (next_page, next_layer) = doc.add_page(Mm(210.0), Mm(297.0), "report");
                current = doc.get_page(next_page).get_layer(next_layer);
                y = 277.0;
            }
            for (i, cell) in row.iter().enumerate() {
                current.use_text(cell, 9.0, Mm(columns[i]), Mm(y), &font);
            }
            y -= 6.0;
        }

        if y < 20.0 {
            let (next_page, next_layer) = doc.add_page(Mm(210.0), Mm(297.0), "report");
            current = doc.get_page(next_page).get_layer(next_layer);
            y = 277.0;
        }
        y -= 2.0;
        current.use_text("Total:", 10.0, Mm(columns[2]), Mm(y), &bold);
        current.use_text(
            format!("{:.2}", self.total_revenue),
            10.0,
            Mm(columns[3]),
            Mm(y),
            &bold,
        );

        doc.save_to_bytes().map_err(|e| AppError::Export(e.to_string()))
    }
}

fn period_label(range: &DateRange) -> String {
    let fmt = |d: Option<NaiveDate>| {
        d.map(|d| d.to_string())
            .unwrap_or_else(|| "All".to_string())
    };
    format!("{} to {}", fmt(range.start), fmt(range.end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn rental(start: Option<&str>, total: Option<&str>) -> Rental {
        Rental {
            id: Uuid::new_v4(),
            apartment_name: Some("Sunset 2A".to_string()),
            payment_amount: Some("10.00".parse().unwrap()),
            days: Some(10),
            total_price: total.map(|t| t.parse().unwrap()),
            start_date: start.map(|s| {
                let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
                Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
            }),
            end_date: None,
            created_at: Utc::now(),
        }
    }

    fn range(start: Option<&str>, end: Option<&str>) -> DateRange {
        DateRange::parse(start, end).unwrap()
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(range(None, None), DateRange::default());
        assert_eq!(range(Some(""), Some(" ")), DateRange::default());
        let r = range(Some("2024-01-01"), Some("2024-01-31"));
        assert_eq!(r.start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(r.end, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert!(DateRange::parse(Some("31-01-2024"), None).is_err());
    }

    #[test]
    fn test_missing_start_date_always_passes() {
        let r = range(Some("2024-01-01"), Some("2024-01-31"));
        assert!(r.contains(None));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let r = range(Some("2024-01-01"), Some("2024-01-31"));
        let at = |s| rental(Some(s), None).start_date;
        assert!(r.contains(at("2024-01-01")));
        assert!(r.contains(at("2024-01-31")));
        assert!(!r.contains(at("2023-12-31")));
        assert!(!r.contains(at("2024-02-01")));
    }

    #[test]
    fn test_unset_bound_is_unbounded() {
        let only_start = range(Some("2024-01-01"), None);
        assert!(only_start.contains(rental(Some("2099-06-01"), None).start_date));
        let only_end = range(None, Some("2024-01-31"));
        assert!(only_end.contains(rental(Some("1999-06-01"), None).start_date));
    }

    // Сценарий из постановки: запись без даты всегда входит в выборку.
    #[test]
    fn test_example_scenario() {
        let records = vec![
            rental(Some("2024-01-10"), Some("100")),
            rental(Some("2024-02-10"), Some("200")),
            rental(None, Some("50")),
        ];
        let r = range(Some("2024-01-01"), Some("2024-01-31"));
        let filtered = filter_rentals(&records, &r);

        assert_eq!(filtered.len(), 2);
        let revenue = total_revenue(filtered.iter().copied());
        assert_eq!(format!("{:.2}", revenue), "150.00");
    }

    #[test]
    fn test_revenue_treats_missing_price_as_zero() {
        let records = vec![rental(None, Some("99.50")), rental(None, None)];
        assert_eq!(format!("{:.2}", total_revenue(records.iter())), "99.50");
    }

    #[test]
    fn test_report_row_formatting() {
        let row = report_row(&rental(Some("2024-01-10"), Some("100")));
        assert_eq!(row[0], "Sunset 2A");
        assert_eq!(row[1], "10.00");
        assert_eq!(row[2], "10");
        assert_eq!(row[3], "100.00");
        assert_eq!(row[4], "10/01/2024");
        assert_eq!(row[5], "-");
    }

    #[test]
    fn test_report_row_fallback_literals() {
        let empty = Rental {
            id: Uuid::new_v4(),
            apartment_name: None,
            payment_amount: None,
            days: None,
            total_price: None,
            start_date: None,
            end_date: None,
            created_at: Utc::now(),
        };
        assert_eq!(report_row(&empty), ["-", "0.00", "0", "0.00", "-", "-"]);
    }

    #[test]
    fn test_build_counts_match_rows() {
        let records = vec![
            rental(Some("2024-01-10"), Some("100")),
            rental(None, Some("50")),
        ];
        let report = RentalReport::build(
            &records,
            DateRange::default(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        );
        assert_eq!(report.record_count, report.rows.len());
        assert_eq!(report.record_count, 2);
    }

    #[test]
    fn test_filename_uses_export_date() {
        let report = RentalReport::build(
            &[],
            DateRange::default(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        );
        assert_eq!(report.filename(), "rental-report-05-03-2024.pdf");
    }

    #[test]
    fn test_empty_report_renders_valid_pdf() {
        let report = RentalReport::build(
            &[],
            range(Some("2024-01-01"), None),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        );
        assert_eq!(report.record_count, 0);
        assert_eq!(format!("{:.2}", report.total_revenue), "0.00");

        let bytes = report.render_pdf().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_report_paginates() {
        let records: Vec<Rental> = (0..120).map(|_| rental(None, Some("10"))).collect();
        let report = RentalReport::build(
            &records,
            DateRange::default(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        );
        let bytes = report.render_pdf().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
