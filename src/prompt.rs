use crate::models::{CodeCorpus, CodeIndex};

/// Renders the question, the full file index and the full corpus into one prompt.
pub fn assemble(question: &str, code_index: &CodeIndex, code_corpus: &CodeCorpus) -> String {
    let index_listing = code_index
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Question: {question}\n\
         \n\
         Context:\n\
         - The entire codebase is provided below.\n\
         - Here is an index of all of the files in the codebase:\n\
         \n\
         {index_listing}\n\
         \n\
         - Then each of the files is concatenated together. You will find all of the code you need:\n\
         \n\
         {corpus}\n\
         \n\
         Answer:\n",
        corpus = code_corpus.as_str(),
    )
}
