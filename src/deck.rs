//! Deck content: a ten-slide summary of the project charter
//!
//! Scope wording is condensed relative to the report; the report carries
//! the full lists.

use anyhow::Result;
use charter_doc_creator::{Deck, DeckTheme, DocProperties};

use crate::PROJECT_TITLE;

pub fn deck_properties() -> DocProperties {
    DocProperties {
        title: PROJECT_TITLE.to_string(),
        creator: "法遵部 / 風控部".to_string(),
        application: "aml-charter-docs".to_string(),
    }
}

pub fn build_deck() -> Result<Deck> {
    let mut deck = Deck::new(DeckTheme::default());

    deck.add_title_slide(
        PROJECT_TITLE,
        "Customer AML Risk Event Summary Model | 專案章程摘要",
    );

    deck.add_content_slide(
        "專案總覽",
        &[
            "專案代號: RISK-AML-MDL-001",
            "發起單位: 法遵部 / 風控部",
            "專案類型: 新系統開發",
            "專案性質: 監理申報 / 法遵要求 / 風險控制",
            "優先等級: P0-Critical（法遵強制要求）",
        ],
    );

    deck.add_table_slide(
        "關鍵時程",
        &["里程碑", "預定日期", "說明"],
        &[
            vec!["需求確認完成", "2025-12-15", "模型設計與資料需求確認"],
            vec!["設計審查通過", "2026-01-31", "技術架構與演算法審查"],
            vec!["開發完成", "2026-04-15", "含單元測試與整合測試"],
            vec!["UAT 測試完成", "2026-05-15", "法遵部與風控部驗收"],
            vec!["正式上線", "2026-05-31", "配合監理申報時程"],
        ],
    )?;

    deck.add_content_slide(
        "預期效益",
        &[
            "人工風險分析時間節省 60% 以上",
            "洗錢風險識別準確率提升至 85% 以上",
            "風險事件摘要從 3 天縮短至即時生成",
            "符合金融監理機關反洗錢法規要求",
            "建立可追溯的風險評估記錄，滿足稽核要求",
        ],
    );

    deck.add_content_slide(
        "問題陳述",
        &[
            "風險事件分散於多個系統，缺乏整合性摘要",
            "人工彙整耗時且容易遺漏關鍵資訊",
            "評分標準不一致，依賴人工判斷",
            "無法即時掌握高風險客戶動態",
            "監理申報準備繁複，資料品質難以保證",
        ],
    );

    deck.add_content_slide(
        "業務驅動因素",
        &[
            "遵循《洗錢防制法》及相關子法規定",
            "滿足金管會對洗錢防制的監理要求",
            "配合國際反洗錢標準（FATF 建議）演進",
            "強化客戶風險分級管理機制",
            "提升異常交易偵測與預警能力",
        ],
    );

    deck.add_content_slide(
        "範圍內 (In Scope)",
        &[
            "多來源客戶風險事件資料整合",
            "洗錢風險評分模型（規則 + 機器學習）",
            "風險事件摘要自動產生與風險等級標註",
            "風險儀表板、趨勢分析與統計報表",
            "高風險客戶預警通知與監理申報匯出",
            "稽核追蹤記錄",
        ],
    );

    deck.add_content_slide(
        "範圍外 (Out of Scope)",
        &[
            "實時交易監控（既有系統負責）",
            "KYC 流程管理（既有系統負責）",
            "STR/SAR 案件調查流程",
            "帳戶凍結或交易阻擋",
            "eKYC 身分驗證與反洗錢教育訓練",
            "跨境交易風險分析（未來期程評估）",
        ],
    );

    deck.add_table_slide(
        "高階風險",
        &["風險", "影響", "應對策略"],
        &[
            vec!["資料品質不佳", "高", "前期資料品質評估，建立資料清理機制"],
            vec!["跨系統整合複雜", "高", "技術可行性驗證(POC)，預留緩衝時程"],
            vec!["模型可解釋性不足", "高", "採用可解釋演算法，建立模型文件化機制"],
            vec!["關鍵人力取得困難", "高", "提前啟動招募或引入外部顧問"],
        ],
    )?;

    deck.add_content_slide(
        "成功標準",
        &[
            "風險模型準確率 ≥ 85%",
            "UAT 測試通過率 ≥ 95%",
            "風險評分運算時間 < 5 分鐘/批次",
            "上線後穩定運行 30 天無重大異常",
            "使用者滿意度 ≥ 4.0 分（5 分量表）",
        ],
    );

    Ok(deck)
}
