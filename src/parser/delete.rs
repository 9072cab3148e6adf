use nom::bytes::complete::tag_no_case;
use nom::IResult;
use nom::multi::many1;
use crate::parser::{space_comma1, Statement};

/// DELETE 1, 2 3
pub(crate) fn delete(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("DELETE")(input)?;
    let (input, ids) = many1(transaction_id)(input)?;
    Ok((input, Statement::Delete(ids)))
}

fn transaction_id(input: &str) -> IResult<&str, u32> {
    let (input, _) = space_comma1(input)?;
    nom::character::complete::u32(input)
}

#[cfg(test)]
mod tests {
    use crate::parser::delete::delete;
    use crate::parser::{parse, Statement};

    #[test]
    fn test() {
        assert_eq!(delete("delete 3"), Ok(("", Statement::Delete(vec![3]))));
        assert_eq!(parse("DELETE 1, 2,3  4;"), Ok(Statement::Delete(vec![1, 2, 3, 4])));
        assert!(parse("delete").is_err());
        assert!(parse("delete abc").is_err());
    }
}
