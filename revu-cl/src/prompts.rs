//! Classification instructions sent as the system message

/// Topic + sentiment extraction prompt
///
/// Asks for the `{"predictions": {"topics": [...], "sentiments": [...]}}`
/// envelope the response parser expects. Sentiment values match the
/// database dimension exactly.
pub const TOPICS_SENTIMENTS_PROMPT: &str = "\
Ты — аналитик отзывов клиентов банка. Прочитай отзыв и определи, какие \
продукты или услуги банка в нём упоминаются и с какой тональностью.

Ответь строго одним JSON-объектом без пояснений:
{\"predictions\": {\"topics\": [\"...\"], \"sentiments\": [\"...\"]}}

Правила:
- topics — список затронутых тем, например: \"Карты\", \"Кредиты\", \
\"Вклады\", \"Счета\", \"Приложение\", \"Служба поддержки\", \
\"Обслуживание в офисе\", \"Карточная служба\", \"Курьерская служба\", \
\"Кэшбэк / Бонусы\".
- sentiments — список тональностей, только значения \"позитив\", \
\"нейтральный\" или \"негатив\".
- Если тем в отзыве нет, верни пустые списки.";
