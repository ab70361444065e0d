use async_trait::async_trait;

use crate::services::ServiceError;

/// Reply used when the context does not contain the answer
pub const NO_ANSWER_REPLY: &str =
    "Com base no material que tenho, não encontrei uma resposta para sua pergunta.";

/// Answers a question using only the supplied context
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn answer(&self, question: &str, context: &str) -> Result<String, ServiceError>;
}

pub fn grounded_answer_prompt(question: &str, context: &str) -> String {
    format!(
        "Você é um assistente acadêmico. Sua tarefa é responder a pergunta do usuário de forma clara e objetiva,\n\
         baseando-se exclusivamente no contexto fornecido abaixo. Não use nenhum conhecimento externo.\n\
         Se a resposta não estiver no contexto, diga \"{no_answer}\"\n\n\
         **Contexto:**\n---\n{context}\n---\n\n\
         **Pergunta do Usuário:**\n{question}\n\n\
         **Resposta Concisa:**\n",
        no_answer = NO_ANSWER_REPLY,
        context = context.trim(),
        question = question.trim(),
    )
}
