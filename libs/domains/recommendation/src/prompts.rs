//! Instruction strings and output caps for the two orchestration calls.

/// First call: the model should identify themes and invoke the retrieval
/// tool. Theme identification is terse, so the cap is tight.
pub const IDENTIFY_THEMES_INSTRUCTIONS: &str = "Based on the user's input, identify relevant \
themes and call the appropriate tool to get book summaries.";

pub const IDENTIFY_MAX_OUTPUT_TOKENS: u32 = 100;

/// Second call: format whatever was retrieved. Summary content must come
/// through verbatim.
pub const FORMAT_RECOMMENDATIONS_INSTRUCTIONS: &str = "Format the book recommendations into a \
user-friendly format. Include title, author, and summary for each book. Do not change the \
content of the summaries.";

pub const FORMAT_MAX_OUTPUT_TOKENS: u32 = 1000;
