pub mod stage1_normalize;
pub mod stage2_classify;
pub mod stage3_layout;
pub mod stage4_charts;
pub mod stage5_report;
