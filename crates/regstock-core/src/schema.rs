/// Arrow schema definitions for exported analysis results.
pub mod stock {
    use arrow::datatypes::{DataType, Field, Schema};

    /// One row per (snapshot date, legislation type, industry) group.
    pub fn aggregate_schema() -> Schema {
        Schema::new(vec![
            Field::new("reference_date", DataType::Date32, false),
            Field::new("legislation_type", DataType::Utf8, false),
            Field::new("industry_code", DataType::Utf8, false),
            Field::new("industry_name", DataType::Utf8, false),
            Field::new("document_count", DataType::UInt64, false),
            Field::new("bc_count", DataType::UInt64, false),
            Field::new("regdata_count", DataType::UInt64, false),
        ])
    }

    /// One row per analysed document, including excluded ones.
    pub fn document_schema() -> Schema {
        Schema::new(vec![
            Field::new("register_id", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, false),
            Field::new("legislation_type", DataType::Utf8, false),
            Field::new("subtype", DataType::Utf8, false),
            Field::new("subtype_group", DataType::Utf8, false),
            Field::new("industry_code", DataType::Utf8, false),
            Field::new("industry_confidence", DataType::Utf8, false),
            Field::new("bc_count", DataType::UInt64, false),
            Field::new("regdata_count", DataType::UInt64, false),
            Field::new("commencement", DataType::Date32, true),
            Field::new("repeal", DataType::Date32, true),
            Field::new("commencement_source", DataType::Utf8, true),
            Field::new("excluded_by", DataType::Utf8, true),
        ])
    }
}
