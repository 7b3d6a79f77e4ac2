use sea_orm::DbErr;

/// Parses a Discord snowflake stored as a String column.
///
/// # Arguments
/// - `column` - Column name, used in the error message
/// - `value` - The stored string value
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed snowflake
/// - `Err(DbErr::Type)` - Stored value is not a valid u64
pub fn parse_snowflake(column: &str, value: &str) -> Result<u64, DbErr> {
    value
        .parse::<u64>()
        .map_err(|e| DbErr::Type(format!("Invalid {} '{}': {}", column, value, e)))
}
