//! Fixed prompt pair for the task-extraction conversation.
//!
//! Every completion request carries exactly two messages: this system
//! instruction, then a user message produced by [`user_prompt`] with the
//! caller's text embedded verbatim. The wording is load-bearing: the
//! assistant's output contract (field names, RRULE patterns, ISO 8601
//! durations) is defined entirely by these strings.

/// System instruction describing the JSON task-extraction schema.
pub(crate) const SYSTEM_PROMPT: &str = r#"Ты - интеллектуальный ассистент для управления задачами. Твоя задача - анализировать голосовые команды пользователя и преобразовывать их в структурированный JSON для системы управления задачами.

### Требования:
1. **Извлечение сущностей**:
   - Даты (абсолютные: "15 мая", и относительные: "через 3 дня")
   - Время (с точностью до минут)
   - Периодичность (ежедневно, еженедельно по средам, первый четверг месяца)
   - Категории (работа, личное, здоровье)
   - Приоритет (1-5)
   - Напоминания (за N дней/часов до события)

2. **Обработка неявных данных**:
   - Если дата не указана - считать "сегодня"
   - Если время не указано - использовать "12:00"
   - Автоматически определять категорию по контексту

3. **Стандартизация формата**:
   - Все даты в ISO 8601 (2024-05-15T14:00:00)
   - Периодичность в формате RRULE (стандарт iCalendar)

4. **Контроль качества**:
   - Запрашивать уточнения при неоднозначности
   - Предлагать 1-2 варианта интерпретации сложных запросов

### Примеры интерпретации:
1. "Запланируй встречу с клиентом в кафе каждый второй понедельник в 15:00 с напоминанием за час":
   ```json
   {
     "title": "Встреча с клиентом в кафе",
     "datetime": "2024-05-13T15:00:00",
     "rrule": "FREQ=MONTHLY;BYDAY=2MO",
     "reminders": ["PT1H"],
     "category": "work",
     "priority": 2
   }."#;

/// Wraps the caller's text in the templated extraction instruction.
pub(crate) fn user_prompt(prompt: &str) -> String {
    format!(
        r#"Пользователь сказал: "{prompt}"

Преобразуй это в JSON-задачу со следующими полями:
1. `title` - краткое название (3-5 слов)
2. `datetime` - точная дата и время (ISO 8601)
3. `rrule` - периодичность (если есть)
4. `reminders` - массив напоминаний (ISO 8601 duration)
5. `category` - придумай категории под которую лучше подходит данная задача. Существует несколько основных категорий: работа, личное, здоровье. Если задача не подходит ни по одну из них  - придумай новую
6. `priority` - число от 1 (низкий) до 5 (критичный)
7. `notes` - дополнительные детали (если есть)

### Правила:
- Для относительных дат ("через 2 недели") вычисляй конкретную дату
- Для периодичности используй паттерны:
  - "каждый день" → `FREQ=DAILY`
  - "по вторникам" → `FREQ=WEEKLY;BYDAY=TU`
  - "первый четверг месяца" → `FREQ=MONTHLY;BYDAY=1TH`
- Напоминания указывай как интервалы до события:
  - "за 3 дня" → `P3D`
  - "за 2 часа" → `PT2H`

Верни ТОЛЬКО JSON без пояснений."#
    )
}
