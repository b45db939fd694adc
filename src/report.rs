//! Report content: the project charter as a flowable story
//!
//! Title page followed by six sections, each opened by a page break. The
//! content is shared by the PDF and the DOCX renderings; styles, column
//! widths and gaps follow the conventions of each format.

use anyhow::Result;
use charter_doc_creator::{
    Alignment, Color, DocProperties, ParagraphStyle, Shading, Span, Story, StyleSheet, Table,
    TableStyle, TextStyle, VerticalAlign,
};

use crate::PROJECT_TITLE;

const INCH: f32 = 72.0;
/// Points per twip.
const TWIP: f32 = 1.0 / 20.0;

const PRIMARY: Color = Color::hex(0x2E5090);
const SECONDARY: Color = Color::hex(0x4472C4);
const ACCENT: Color = Color::hex(0x5B9BD5);
const TABLE_FILL: Color = Color::hex(0xD5E8F0);
const TABLE_GRID: Color = Color::hex(0xCCCCCC);

/// Target of a report story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Docx,
}

impl ReportFormat {
    pub fn styles(self) -> StyleSheet {
        match self {
            ReportFormat::Pdf => report_styles(),
            ReportFormat::Docx => docx_styles(),
        }
    }

    /// Column widths in points. PDF tables are laid out in inches, Word
    /// tables in twips.
    fn widths(self, inches: &[f32], twips: &[u32]) -> Vec<f32> {
        match self {
            ReportFormat::Pdf => inches.iter().map(|w| w * INCH).collect(),
            ReportFormat::Docx => twips.iter().map(|w| *w as f32 * TWIP).collect(),
        }
    }

    /// Vertical gap between blocks, in points.
    fn gap(self, inches: f32, twips: u32) -> f32 {
        match self {
            ReportFormat::Pdf => inches * INCH,
            ReportFormat::Docx => twips as f32 * TWIP,
        }
    }

    /// Shaded header row, centred header text.
    fn data_table(self, pdf_font_size: f32) -> TableStyle {
        let style = TableStyle::new(Shading::HeaderRow, TABLE_FILL, TABLE_GRID)
            .valign(VerticalAlign::Middle)
            .header_align(Alignment::Center);
        match self {
            ReportFormat::Pdf => style.font_size(pdf_font_size).padding(6.0),
            ReportFormat::Docx => docx_cells(style),
        }
    }

    /// Shaded key column.
    fn key_value(self, valign: VerticalAlign) -> TableStyle {
        let style = TableStyle::new(Shading::KeyColumn, TABLE_FILL, TABLE_GRID);
        match self {
            ReportFormat::Pdf => style.font_size(10.0).padding(8.0).valign(valign),
            ReportFormat::Docx => docx_cells(style).valign(VerticalAlign::Top),
        }
    }
}

// Word tables: body-size text, 100/180 twip cell margins, hairline borders.
fn docx_cells(style: TableStyle) -> TableStyle {
    style
        .font_size(12.0)
        .padding(100.0 * TWIP)
        .horizontal_padding(180.0 * TWIP)
        .grid_width(0.125)
}

pub fn report_styles() -> StyleSheet {
    let body = ParagraphStyle::new("CustomNormal", 10.0, 14.0).align(Alignment::Justify);
    StyleSheet {
        title: ParagraphStyle::new("CustomTitle", 24.0, 30.0)
            .bold()
            .color(PRIMARY)
            .align(Alignment::Center)
            .spacing(0.0, 20.0),
        heading1: ParagraphStyle::new("CustomHeading1", 18.0, 22.0)
            .bold()
            .color(PRIMARY)
            .spacing(24.0, 12.0)
            .outline_level(0),
        heading2: ParagraphStyle::new("CustomHeading2", 14.0, 18.0)
            .bold()
            .color(SECONDARY)
            .spacing(18.0, 10.0)
            .outline_level(1),
        heading3: ParagraphStyle::new("CustomHeading3", 12.0, 16.0)
            .bold()
            .color(ACCENT)
            .spacing(12.0, 8.0)
            .outline_level(2),
        bullet: ParagraphStyle {
            name: "CustomBullet".to_string(),
            ..body.clone()
        }
        .indent(20.0)
        .bullet('•', 10.0)
        .spacing(0.0, 6.0),
        body,
    }
}

/// Word styles: Arial 12pt body, black 28pt title, bullets indented half
/// an inch with a quarter-inch hang.
pub fn docx_styles() -> StyleSheet {
    let body = ParagraphStyle::new("Normal", 12.0, 14.4);
    StyleSheet {
        title: ParagraphStyle::new("Title", 28.0, 33.6)
            .bold()
            .color(Color::BLACK)
            .align(Alignment::Center)
            .spacing(12.0, 6.0),
        heading1: ParagraphStyle::new("Heading 1", 16.0, 19.2)
            .bold()
            .color(PRIMARY)
            .spacing(12.0, 6.0)
            .outline_level(0),
        heading2: ParagraphStyle::new("Heading 2", 14.0, 16.8)
            .bold()
            .color(SECONDARY)
            .spacing(9.0, 5.0)
            .outline_level(1),
        heading3: ParagraphStyle::new("Heading 3", 12.0, 14.4)
            .bold()
            .color(ACCENT)
            .spacing(6.0, 4.0)
            .outline_level(2),
        bullet: ParagraphStyle {
            name: "List Bullet".to_string(),
            ..body.clone()
        }
        .indent(36.0)
        .bullet('•', 18.0),
        body,
    }
}

pub fn report_properties() -> DocProperties {
    DocProperties {
        title: format!("{} 專案基本資料 (00_meta)", PROJECT_TITLE),
        creator: "法遵部 / 風控部".to_string(),
        application: "aml-charter-docs".to_string(),
    }
}

/// The report laid out for PDF.
pub fn build_report_story() -> Result<Story> {
    build_story(ReportFormat::Pdf)
}

/// The report laid out for Word.
pub fn build_docx_story() -> Result<Story> {
    build_story(ReportFormat::Docx)
}

pub fn build_story(format: ReportFormat) -> Result<Story> {
    let mut story = Story::new(format.styles());

    // Title page
    story
        .paragraph(TextStyle::Title, PROJECT_TITLE)
        .paragraph(TextStyle::Title, "專案基本資料 (00_meta)")
        .spacer(format.gap(0.3, 200))
        .rich(
            TextStyle::Body,
            vec![
                Span::bold("建立日期:"),
                Span::plain(" 2025-11-14 | "),
                Span::bold("文件版本:"),
                Span::plain(" 1.0.0"),
            ],
        )
        .page_break();

    overview_section(&mut story, format)?;
    background_section(&mut story, format);
    scope_section(&mut story, format);
    priority_section(&mut story, format)?;
    success_section(&mut story, format);
    appendix_section(&mut story, format)?;

    Ok(story)
}

fn overview_section(story: &mut Story, format: ReportFormat) -> Result<()> {
    story
        .paragraph(TextStyle::Heading1, "專案總覽")
        .paragraph(TextStyle::Heading2, "專案識別資訊")
        .table(Table::key_value(
            &[
                &["專案代號", "RISK-AML-MDL-001"],
                &["專案名稱", PROJECT_TITLE],
                &["英文名稱", "Customer AML Risk Event Summary Model"],
                &["發起單位", "法遵部 / 風控部"],
                &["專案類型", "新系統開發"],
                &["專案性質", "監理申報 / 法遵要求 / 風險控制"],
            ],
            &format.widths(&[2.0, 4.5], &[3120, 6240]),
            format.key_value(VerticalAlign::Middle),
        )?)
        .spacer(format.gap(0.2, 200));

    story
        .paragraph(TextStyle::Heading2, "關鍵時程")
        .table(Table::with_header(
            &["里程碑", "預定日期", "狀態", "備註"],
            &[
                &["需求確認完成", "2025-12-15", "規劃中", "包含模型設計與資料需求"],
                &["設計審查通過", "2026-01-31", "規劃中", "技術架構與模型演算法審查"],
                &["開發完成", "2026-04-15", "規劃中", "含單元測試與整合測試"],
                &["UAT 測試完成", "2026-05-15", "規劃中", "法遵部與風控部驗收"],
                &["正式上線", "2026-05-31", "規劃中", "配合監理申報時程"],
            ],
            &format.widths(&[1.6, 1.4, 1.2, 2.3], &[2340, 2340, 2340, 2340]),
            format.data_table(9.0),
        )?)
        .spacer(format.gap(0.2, 200));

    story
        .paragraph(TextStyle::Heading2, "預期效益")
        .paragraph(TextStyle::Heading3, "量化效益")
        .bullets([
            "減少人工風險分析時間: 預估節省 60% 以上",
            "提升洗錢風險識別準確率: 目標提升至 85% 以上",
            "加速風險事件摘要產出: 從 3 天縮短至即時生成",
        ])
        .spacer(format.gap(0.15, 150))
        .paragraph(TextStyle::Heading3, "質化效益")
        .bullets([
            "符合金融監理機關反洗錢法規要求",
            "強化客戶風險管控能力，降低法遵風險",
            "提供管理層即時風險儀表板，支援決策",
            "建立可追溯的風險評估記錄，滿足稽核要求",
        ])
        .page_break();
    Ok(())
}

fn background_section(story: &mut Story, format: ReportFormat) {
    story
        .paragraph(TextStyle::Heading1, "專案背景")
        .paragraph(TextStyle::Heading2, "問題陳述")
        .rich(TextStyle::Body, vec![Span::bold("現行痛點:")])
        .bullets([
            "客戶洗錢風險事件分散於多個系統，缺乏整合性摘要",
            "人工彙整風險事件耗時且容易遺漏關鍵資訊",
            "風險評分標準不一致，依賴人工判斷，缺乏客觀性",
            "無法即時掌握高風險客戶動態，影響預警能力",
            "監理申報準備作業繁複，資料品質難以保證",
        ])
        .spacer(format.gap(0.2, 200))
        .paragraph(TextStyle::Heading2, "業務驅動因素")
        .paragraph(TextStyle::Heading3, "法規要求")
        .bullets([
            "遵循《洗錢防制法》及相關子法規定",
            "滿足金融監理機關（如金管會）對於洗錢防制的監理要求",
            "配合國際反洗錢標準（FATF 建議）的持續演進",
        ])
        .spacer(format.gap(0.15, 150))
        .paragraph(TextStyle::Heading3, "風險管理需求")
        .bullets([
            "強化客戶風險分級管理機制",
            "建立可量化、可追溯的風險評估模型",
            "提升異常交易偵測與預警能力",
        ])
        .page_break();
}

fn scope_section(story: &mut Story, format: ReportFormat) {
    story
        .paragraph(TextStyle::Heading1, "專案範圍")
        .paragraph(TextStyle::Heading2, "範圍內 (In Scope)")
        .paragraph(TextStyle::Heading3, "功能範圍")
        .bullets([
            "客戶風險事件資料整合引擎（從多個來源系統擷取）",
            "洗錢風險評分模型（基於規則與機器學習）",
            "客戶風險事件摘要自動產生功能",
            "風險等級分類與標註（高/中/低風險）",
            "風險儀表板與視覺化介面",
            "風險趨勢分析與統計報表",
            "高風險客戶自動預警通知",
            "監理申報資料匯出功能",
            "稽核追蹤記錄（評分歷程與變更記錄）",
        ])
        .spacer(format.gap(0.2, 200))
        .paragraph(TextStyle::Heading2, "範圍外 (Out of Scope)")
        .bullets([
            "不包含實時交易監控功能（由既有交易監控系統負責）",
            "不包含客戶盡職調查(KYC)流程管理（由既有 KYC 系統負責）",
            "不包含可疑交易申報(STR/SAR)的案件調查流程",
            "不包含帳戶凍結或交易阻擋功能",
            "不涉及客戶身分驗證(eKYC)機制",
            "不包含反洗錢教育訓練管理",
            "第一期不包含跨境交易風險分析（未來期程評估）",
        ])
        .page_break();
}

fn priority_section(story: &mut Story, format: ReportFormat) -> Result<()> {
    story
        .paragraph(TextStyle::Heading1, "優先順序與依賴")
        .paragraph(TextStyle::Heading2, "專案優先級")
        .table(Table::key_value(
            &[
                &["優先等級", "P0-Critical"],
                &[
                    "優先級理由",
                    "• 屬於法遵強制要求，關係到監理合規\n\
                     • 影響組織法遵風險與聲譽風險\n\
                     • 監理機關持續加強反洗錢檢查力度\n\
                     • 若未符合要求可能面臨裁罰或業務限制",
                ],
            ],
            &format.widths(&[2.0, 4.5], &[3120, 6240]),
            format.key_value(VerticalAlign::Top),
        )?)
        .spacer(format.gap(0.2, 200));

    story
        .paragraph(TextStyle::Heading2, "高階風險")
        .table(Table::with_header(
            &["風險ID", "風險描述", "機率", "影響", "應對策略"],
            &[
                &["R001", "資料品質不佳導致模型準確度低", "高", "高", "前期進行資料品質評估，建立資料清理機制"],
                &["R002", "跨系統資料整合複雜度高於預期", "中", "高", "提前進行技術可行性驗證(POC)，預留緩衝時程"],
                &["R003", "模型可解釋性不足無法通過稽核", "中", "高", "採用可解釋的模型演算法，建立模型文件化機制"],
                &["R004", "關鍵人力（資料科學家）取得困難", "中", "高", "提前啟動人力招募，或考慮外部顧問支援"],
            ],
            &format.widths(&[0.8, 1.8, 0.7, 0.7, 2.5], &[1560, 2340, 1560, 1560, 2340]),
            format.data_table(8.0).center_columns([2, 3]),
        )?)
        .page_break();
    Ok(())
}

fn success_section(story: &mut Story, format: ReportFormat) {
    story
        .paragraph(TextStyle::Heading1, "成功標準")
        .paragraph(TextStyle::Heading2, "專案成功指標")
        .paragraph(TextStyle::Heading3, "完成標準 (Definition of Done)")
        .bullets([
            "所有範圍內功能開發完成並通過測試",
            "風險模型準確率達到設定門檻（目標 ≥ 85%）",
            "UAT 測試通過率 ≥ 95%",
            "效能測試符合 SLA 要求（風險評分運算時間 < 5 分鐘/批次）",
            "資安測試通過（無高風險與中風險弱點）",
            "所有高階與中階風險已關閉或轉移",
            "文件交付完整（使用者手冊、模型文件、維運手冊、技術文件、API 文件）",
            "正式上線後穩定運行 30 天無重大異常",
            "使用者滿意度調查 ≥ 4.0 分（5 分量表）",
        ])
        .spacer(format.gap(0.15, 150))
        .paragraph(TextStyle::Heading3, "驗收標準 (Acceptance Criteria)")
        .bullets([
            "法遵部與風控部簽核業務驗收",
            "模型驗證委員會通過模型驗證",
            "資安檢測通過（弱點掃描、滲透測試）",
            "稽核部確認稽核追蹤機制符合要求",
            "技術文件審查通過",
            "災難復原演練通過",
        ])
        .page_break();
}

fn appendix_section(story: &mut Story, format: ReportFormat) -> Result<()> {
    story
        .paragraph(TextStyle::Heading1, "附錄")
        .paragraph(TextStyle::Heading2, "專有名詞與縮寫")
        .table(Table::with_header(
            &["名詞", "全名", "說明"],
            &[
                &["AML", "Anti-Money Laundering", "反洗錢"],
                &["KYC", "Know Your Customer", "認識你的客戶（客戶盡職調查）"],
                &["STR", "Suspicious Transaction Report", "可疑交易報告"],
                &["FATF", "Financial Action Task Force", "防制洗錢金融行動工作組織"],
                &["PEP", "Politically Exposed Persons", "政治公眾人物"],
                &["ML", "Machine Learning", "機器學習"],
                &["UAT", "User Acceptance Testing", "使用者驗收測試"],
                &["SLA", "Service Level Agreement", "服務水準協議"],
            ],
            &format.widths(&[1.0, 2.5, 3.0], &[1872, 3120, 4368]),
            format.data_table(9.0),
        )?)
        .spacer(format.gap(0.3, 300));

    story
        .paragraph(TextStyle::Heading2, "版本歷史")
        .table(Table::with_header(
            &["版本", "日期", "修訂者", "修訂內容"],
            &[&[
                "1.0.0",
                "2025-11-14",
                "Claude (SpecKit Meta)",
                "初版建立，透過 /speckit.meta 自動產生",
            ]],
            &format.widths(&[1.0, 1.3, 1.7, 2.5], &[1560, 1872, 1872, 4056]),
            format.data_table(9.0),
        )?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullet_style_extends_body() {
        let styles = report_styles();
        assert_eq!(styles.bullet.font_size, styles.body.font_size);
        assert_eq!(styles.bullet.alignment, Alignment::Justify);
        assert_eq!(styles.bullet.left_indent, 20.0);
        assert_eq!(styles.bullet.space_after, 6.0);
    }

    #[test]
    fn risk_table_centres_probability_and_impact() {
        let story = build_report_story().unwrap();
        let risk = story
            .tables()
            .find(|t| t.header().is_some_and(|h| h[0] == "風險ID"))
            .unwrap();
        assert_eq!(risk.style().cell_alignment(1, 2), Alignment::Center);
        assert_eq!(risk.style().cell_alignment(1, 4), Alignment::Left);
        assert_eq!(risk.style().font_size, 8.0);
    }

    #[test]
    fn priority_table_is_top_aligned() {
        let story = build_report_story().unwrap();
        let priority = story
            .tables()
            .find(|t| t.rows()[0][0] == "優先等級")
            .unwrap();
        assert_eq!(priority.style().valign, VerticalAlign::Top);
        assert!(priority.rows()[1][1].contains('\n'));
    }

    #[test]
    fn formats_share_content() {
        let pdf = build_story(ReportFormat::Pdf).unwrap();
        let docx = build_story(ReportFormat::Docx).unwrap();
        assert_eq!(pdf.len(), docx.len());

        let texts = |story: &Story| story.paragraphs().map(|p| p.text()).collect::<Vec<_>>();
        assert_eq!(texts(&pdf), texts(&docx));
        let rows = |story: &Story| {
            story
                .tables()
                .map(|t| t.rows().to_vec())
                .collect::<Vec<_>>()
        };
        assert_eq!(rows(&pdf), rows(&docx));
    }

    #[test]
    fn docx_widths_are_twips() {
        let story = build_docx_story().unwrap();
        let timeline = story
            .tables()
            .find(|t| t.header().is_some_and(|h| h[0] == "里程碑"))
            .unwrap();
        assert_eq!(timeline.column_widths(), [117.0; 4]);
        assert_eq!(timeline.style().font_size, 12.0);
        assert_eq!(story.styles().body.font_size, 12.0);
        assert_eq!(story.styles().title.color, Color::BLACK);
    }
}
