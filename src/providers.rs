use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchProvider {
    SerpApi,
    Brave,
    Serper,
}

impl SearchProvider {
    pub const ALL: [SearchProvider; 3] = [
        SearchProvider::SerpApi,
        SearchProvider::Brave,
        SearchProvider::Serper,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "serpapi" => Some(SearchProvider::SerpApi),
            "brave" => Some(SearchProvider::Brave),
            "serper" => Some(SearchProvider::Serper),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            SearchProvider::SerpApi => "serpapi",
            SearchProvider::Brave => "brave",
            SearchProvider::Serper => "serper",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            SearchProvider::SerpApi => "https://serpapi.com/search.json",
            SearchProvider::Brave => "https://api.search.brave.com/res/v1/web/search",
            SearchProvider::Serper => "https://google.serper.dev/search",
        }
    }
}

impl fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    Groq,
    Cohere,
    Anthropic,
}

impl AiProvider {
    pub const ALL: [AiProvider; 4] = [
        AiProvider::OpenAi,
        AiProvider::Groq,
        AiProvider::Cohere,
        AiProvider::Anthropic,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "openai" => Some(AiProvider::OpenAi),
            "groq" => Some(AiProvider::Groq),
            "cohere" => Some(AiProvider::Cohere),
            "anthropic" => Some(AiProvider::Anthropic),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::Groq => "groq",
            AiProvider::Cohere => "cohere",
            AiProvider::Anthropic => "anthropic",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "https://api.openai.com/v1/chat/completions",
            AiProvider::Groq => "https://api.groq.com/openai/v1/chat/completions",
            AiProvider::Cohere => "https://api.cohere.ai/v1/generate",
            AiProvider::Anthropic => "https://api.anthropic.com/v1/messages",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "gpt-3.5-turbo",
            AiProvider::Groq => "mixtral-8x7b-32768",
            AiProvider::Cohere => "command",
            AiProvider::Anthropic => "claude-3-sonnet-20240229",
        }
    }

    // Incremental delivery is only wired up for the OpenAI-compatible APIs.
    pub fn supports_streaming(&self) -> bool {
        matches!(self, AiProvider::OpenAi | AiProvider::Groq)
    }

    pub fn supports_chat(&self) -> bool {
        matches!(self, AiProvider::OpenAi | AiProvider::Groq)
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("serpapi", Some(SearchProvider::SerpApi))]
    #[case("brave", Some(SearchProvider::Brave))]
    #[case("serper", Some(SearchProvider::Serper))]
    #[case("google", None)]
    #[case("", None)]
    #[case("SERPAPI", None)]
    fn search_provider_tokens(#[case] token: &str, #[case] expected: Option<SearchProvider>) {
        assert_eq!(SearchProvider::parse(token), expected);
    }

    #[rstest]
    #[case("openai", Some(AiProvider::OpenAi))]
    #[case("groq", Some(AiProvider::Groq))]
    #[case("cohere", Some(AiProvider::Cohere))]
    #[case("anthropic", Some(AiProvider::Anthropic))]
    #[case("mistral", None)]
    fn ai_provider_tokens(#[case] token: &str, #[case] expected: Option<AiProvider>) {
        assert_eq!(AiProvider::parse(token), expected);
    }

    #[test]
    fn streaming_and_chat_capabilities() {
        assert!(AiProvider::OpenAi.supports_streaming());
        assert!(AiProvider::Groq.supports_streaming());
        assert!(!AiProvider::Cohere.supports_streaming());
        assert!(!AiProvider::Anthropic.supports_streaming());

        assert!(AiProvider::OpenAi.supports_chat());
        assert!(!AiProvider::Anthropic.supports_chat());
    }

    #[test]
    fn tokens_round_trip() {
        for provider in SearchProvider::ALL {
            assert_eq!(SearchProvider::parse(provider.token()), Some(provider));
        }
        for provider in AiProvider::ALL {
            assert_eq!(AiProvider::parse(provider.token()), Some(provider));
        }
    }
}
