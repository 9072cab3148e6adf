use nom::bytes::complete::tag_no_case;
use nom::character::complete::multispace1;
use nom::IResult;
use nom::sequence::tuple;
use crate::parser::Statement;

/// Parse `EXPORT TO file_path` pattern.
pub(crate) fn export(input: &str) -> IResult<&str, Statement> {
    let (file_path, _) = tuple((tag_no_case("EXPORT"), multispace1, tag_no_case("TO"), multispace1))(input)?;
    let quotation_marks: &[_] = &['\'', '"'];
    let path = file_path.trim().trim_matches(quotation_marks);
    if path.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(file_path, nom::error::ErrorKind::NonEmpty)));
    }
    Ok(("", Statement::Export(path.to_string())))
}
