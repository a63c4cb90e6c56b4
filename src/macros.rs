/// Builds a [`Sheet`](crate::Sheet) from rows of string literals, header first.
///
/// Rows may have different lengths; an empty row `[]` is kept as padding.
///
/// # Examples
///
/// ```rust
/// use cueform::sheet;
///
/// let survey = sheet![
///     ["type", "name", "label::English (en)"],
///     ["begin_group", "father", "Father"],
///     ["integer", "age", "How old is your father?"],
///     ["end_group"],
/// ];
/// assert_eq!(survey.rows.len(), 4);
/// assert_eq!(survey.rows[3], vec!["end_group".to_string()]);
/// ```
#[macro_export]
macro_rules! sheet {
    // Handle empty sheet
    () => {
        $crate::Sheet::new()
    };

    ($([ $($cell:expr),* $(,)? ]),+ $(,)?) => {
        $crate::Sheet::from_rows(vec![
            $(
                vec![$(::std::string::String::from($cell)),*]
            ),+
        ])
    };
}
