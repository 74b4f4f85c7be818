//! Prompt templates, fixed user-facing messages and starter questions.

use llm_service::ChatMessage;

use crate::api_types::{ConversationTurn, Role};

/// System instructions sent with every generation.
pub const SYSTEM_PROMPT: &str = r#"You are an AI assistant for Alinta Energy customers in Australia. Your role is to help customers understand electricity and gas plans, billing, payments, and support options.

**Core Rules:**
1. **Use only provided context**: Answer questions using ONLY the information in the provided context from Alinta Energy's website
2. **Be accurate**: Never invent prices, dates, plan details, or account-specific information
3. **Admit limitations**: If information is not in the context, say "I don't have that specific information" and suggest contacting Alinta Energy directly
4. **Be helpful and friendly**: Use a warm, conversational tone while remaining professional
5. **Use plain language**: Explain energy concepts in simple terms that any customer can understand
6. **Cite sources**: Reference the sources when providing specific information
7. **Direct when needed**: For account-specific questions (bills, payments, account changes), direct customers to:
   - Call: 13 13 58
   - Visit: alintaenergy.com.au/myaccount
   - Email: customer.service@alintaenergy.com.au

**What you can help with:**
- Explaining electricity and gas plans available in different states
- Understanding bills, charges, and tariffs
- Payment options and methods
- Moving house procedures
- Solar feed-in tariffs and renewable energy
- Hardship support and payment assistance
- General energy terminology and concepts

**What you cannot do:**
- Access customer account details
- Make changes to accounts or plans
- Process payments
- Provide personalized pricing without plan details
- Guarantee specific outcomes or savings

**Tone:**
- Friendly and approachable
- Clear and concise
- Patient and understanding
- Professional and trustworthy

Remember: Your goal is to help customers make informed decisions and find the right information easily."#;

/// Build the final user message: retrieved context, then the question.
///
/// # Example
/// ```
/// # use rag_orchestrator::prompt::build_rag_prompt;
/// let p = build_rag_prompt("How do I pay?", "[Source 1: Payments]\n...");
/// assert!(p.contains("**Customer question:** How do I pay?"));
/// ```
pub fn build_rag_prompt(question: &str, context: &str) -> String {
    format!(
        "**Context from Alinta Energy website:**\n\n\
         {context}\n\n\
         ---\n\n\
         **Customer question:** {question}\n\n\
         Please provide a helpful answer based on the context above. If the context doesn't \
         contain enough information to fully answer the question, acknowledge this and suggest \
         how the customer can get more specific help."
    )
}

/// Full message list for one generation: system instructions, the given
/// history in order, then the context and question.
pub fn build_messages(
    question: &str,
    context: &str,
    history: &[ConversationTurn],
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));
    messages.extend(history.iter().map(|t| match t.role {
        Role::User => ChatMessage::user(t.content.clone()),
        Role::Assistant => ChatMessage::assistant(t.content.clone()),
    }));
    messages.push(ChatMessage::user(build_rag_prompt(question, context)));
    messages
}

/// Fixed texts shown to customers instead of internal errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserMessage {
    RetrievalFailed,
    GenerationFailed,
    NoContext,
    InvalidRequest,
    EmptyQuestion,
    Initializing,
}

impl UserMessage {
    pub const fn as_str(self) -> &'static str {
        match self {
            UserMessage::RetrievalFailed => {
                "I'm having trouble accessing information right now. Please try again in a moment \
                 or contact Alinta Energy directly at 13 13 58."
            }
            UserMessage::GenerationFailed => {
                "I apologize, but I encountered an error generating a response. Please try \
                 rephrasing your question or contact Alinta Energy at 13 13 58."
            }
            UserMessage::NoContext => {
                "I couldn't find relevant information to answer your question. For specific \
                 details, please contact Alinta Energy at 13 13 58 or visit alintaenergy.com.au."
            }
            UserMessage::InvalidRequest => {
                "I didn't quite understand that. Could you please rephrase your question?"
            }
            UserMessage::EmptyQuestion => "Question cannot be empty",
            UserMessage::Initializing => "Service is initializing. Please try again in a moment.",
        }
    }
}

/// Suggested questions for a fresh conversation.
pub const STARTER_QUESTIONS: [&str; 8] = [
    "What electricity plans are available in my state?",
    "How do I pay my energy bill?",
    "What is a solar feed-in tariff?",
    "What should I do if I'm moving house?",
    "How can I get help with paying my bill?",
    "What's the difference between fixed and variable rates?",
    "How do I read my energy bill?",
    "What hardship programs are available?",
];

#[cfg(test)]
mod tests {
    use super::*;
    use llm_service::ChatRole;

    #[test]
    fn prompt_puts_context_before_question() {
        let p = build_rag_prompt("What is a feed-in tariff?", "CTX");
        let ctx = p.find("CTX").unwrap();
        let q = p.find("What is a feed-in tariff?").unwrap();
        assert!(ctx < q);
        assert!(p.starts_with("**Context from Alinta Energy website:**\n\nCTX\n\n---\n\n"));
    }

    #[test]
    fn messages_wrap_history_between_system_and_question() {
        let history = vec![
            ConversationTurn::user("What plans are available?"),
            ConversationTurn::assistant("Several."),
        ];
        let msgs = build_messages("And in WA?", "CTX", &history);

        let roles: Vec<ChatRole> = msgs.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::System, ChatRole::User, ChatRole::Assistant, ChatRole::User]
        );
        assert_eq!(msgs[0].content, SYSTEM_PROMPT);
        assert_eq!(msgs[2].content, "Several.");
        assert!(msgs[3].content.contains("And in WA?"));
    }

    #[test]
    fn failure_messages_are_distinct() {
        assert_ne!(
            UserMessage::RetrievalFailed.as_str(),
            UserMessage::GenerationFailed.as_str()
        );
        assert!(UserMessage::NoContext.as_str().contains("13 13 58"));
    }
}
